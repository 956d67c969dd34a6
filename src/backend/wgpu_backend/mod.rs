//! wgpu backend implementation
//!
//! Allocates graph resources as `wgpu::Texture`s. wgpu tracks resource usage
//! itself, so transition directives are only logged; clears are encoded as
//! empty render passes (render targets) or `clear_texture` (storage only).

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{
    Backend, BackendError, BackendResult, BufferHandle, CommandSink, ViewHandle, ViewKind,
};
use crate::graph::{ResourceDescriptor, ResourceFlags, TransitionDirective};
use crate::types::{Extent2d, TextureFormat};

struct WgpuTexture {
    texture: wgpu::Texture,
    format: TextureFormat,
    flags: ResourceFlags,
    views: Vec<u64>,
}

/// wgpu backend implementation
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    textures: HashMap<u64, WgpuTexture>,
    texture_views: HashMap<u64, wgpu::TextureView>,
    next_texture_id: u64,
    next_view_id: u64,
}

impl WgpuBackend {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            textures: HashMap::new(),
            texture_views: HashMap::new(),
            next_texture_id: 1,
            next_view_id: 1,
        }
    }

    fn convert_texture_format(format: TextureFormat) -> wgpu::TextureFormat {
        match format {
            TextureFormat::R8Unorm => wgpu::TextureFormat::R8Unorm,
            TextureFormat::R16Float => wgpu::TextureFormat::R16Float,
            TextureFormat::Rg8Unorm => wgpu::TextureFormat::Rg8Unorm,
            TextureFormat::R32Float => wgpu::TextureFormat::R32Float,
            TextureFormat::R32Uint => wgpu::TextureFormat::R32Uint,
            TextureFormat::Rg16Float => wgpu::TextureFormat::Rg16Float,
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgb10a2Unorm => wgpu::TextureFormat::Rgb10a2Unorm,
            TextureFormat::Rg11b10Float => wgpu::TextureFormat::Rg11b10Float,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::Rg32Float => wgpu::TextureFormat::Rg32Float,
            TextureFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
            TextureFormat::Depth16Unorm => wgpu::TextureFormat::Depth16Unorm,
            TextureFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
            TextureFormat::Depth32FloatStencil8 => wgpu::TextureFormat::Depth32FloatStencil8,
        }
    }

    fn convert_usage(flags: ResourceFlags) -> wgpu::TextureUsages {
        // Every graph resource can be sampled and cleared.
        let mut result = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if flags.intersects(ResourceFlags::COLOR_TARGET | ResourceFlags::DEPTH_TARGET) {
            result |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        if flags.contains(ResourceFlags::STORAGE) {
            result |= wgpu::TextureUsages::STORAGE_BINDING;
        }
        result
    }

    /// The texture behind `buffer`.
    pub fn texture(&self, buffer: BufferHandle) -> Option<&wgpu::Texture> {
        self.textures.get(&buffer.raw()).map(|tex| &tex.texture)
    }

    /// The texture view behind `view`.
    pub fn texture_view(&self, view: ViewHandle) -> Option<&wgpu::TextureView> {
        self.texture_views.get(&view.raw())
    }

    /// A command sink encoding into `encoder`.
    pub fn command_sink<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> WgpuCommandSink<'a> {
        WgpuCommandSink {
            backend: self,
            encoder,
        }
    }
}

impl Backend for WgpuBackend {
    fn allocate(
        &mut self,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> BackendResult<BufferHandle> {
        if extent.is_empty() {
            return Err(BackendError::BufferCreationFailed(format!(
                "empty extent {}",
                extent
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: descriptor.mip_levels,
            sample_count: descriptor.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::convert_texture_format(descriptor.format),
            usage: Self::convert_usage(descriptor.flags),
            view_formats: &[],
        });

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(
            id,
            WgpuTexture {
                texture,
                format: descriptor.format,
                flags: descriptor.flags,
                views: Vec::new(),
            },
        );

        Ok(BufferHandle::new(id))
    }

    fn destroy(&mut self, buffer: BufferHandle) {
        if let Some(tex) = self.textures.remove(&buffer.raw()) {
            for view in &tex.views {
                self.texture_views.remove(view);
            }
            tex.texture.destroy();
        }
    }

    fn view(&mut self, buffer: BufferHandle, kind: ViewKind) -> BackendResult<ViewHandle> {
        let tex = self
            .textures
            .get_mut(&buffer.raw())
            .ok_or(BackendError::UnknownBuffer(buffer))?;

        let enabled = match kind {
            ViewKind::ShaderRead => true,
            ViewKind::ColorTarget => tex.flags.contains(ResourceFlags::COLOR_TARGET),
            ViewKind::DepthTarget => tex.flags.contains(ResourceFlags::DEPTH_TARGET),
            ViewKind::StorageReadWrite => tex.flags.contains(ResourceFlags::STORAGE),
        };
        if !enabled {
            return Err(BackendError::ViewNotSupported { buffer, kind });
        }

        // Sampling a depth/stencil texture reads the depth aspect only.
        let aspect = if kind == ViewKind::ShaderRead && tex.format.has_stencil() {
            wgpu::TextureAspect::DepthOnly
        } else {
            wgpu::TextureAspect::All
        };
        // Attachments and storage bindings address a single mip.
        let mip_level_count = match kind {
            ViewKind::ShaderRead => None,
            _ => Some(1),
        };

        let view = tex.texture.create_view(&wgpu::TextureViewDescriptor {
            label: None,
            aspect,
            mip_level_count,
            ..Default::default()
        });

        let id = self.next_view_id;
        self.next_view_id += 1;
        self.texture_views.insert(id, view);
        tex.views.push(id);

        Ok(ViewHandle::new(id))
    }
}

/// Encodes frame graph commands into a `wgpu::CommandEncoder`.
pub struct WgpuCommandSink<'a> {
    backend: &'a WgpuBackend,
    encoder: &'a mut wgpu::CommandEncoder,
}

impl CommandSink for WgpuCommandSink<'_> {
    fn encode_transition(&mut self, directive: &TransitionDirective) {
        // wgpu inserts the actual barriers when the texture is used.
        log::trace!(
            "wgpu: {:?} {:?} -> {:?}",
            directive.buffer,
            directive.before,
            directive.after
        );
    }

    fn encode_clear(&mut self, buffer: BufferHandle) {
        let Some(tex) = self.backend.textures.get(&buffer.raw()) else {
            // Imported and swapchain textures are cleared by their owner.
            log::debug!("wgpu: skipping clear of foreign buffer {:?}", buffer);
            return;
        };

        if tex.flags.intersects(ResourceFlags::COLOR_TARGET | ResourceFlags::DEPTH_TARGET) {
            let view = tex.texture.create_view(&wgpu::TextureViewDescriptor {
                mip_level_count: Some(1),
                ..Default::default()
            });
            let is_depth = tex.flags.contains(ResourceFlags::DEPTH_TARGET);

            let color_attachment = (!is_depth).then(|| wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            });
            let depth_attachment = is_depth.then(|| wgpu::RenderPassDepthStencilAttachment {
                view: &view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: tex.format.has_stencil().then_some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            });

            let color_attachments = [color_attachment];
            let color_attachments: &[Option<wgpu::RenderPassColorAttachment>] = if is_depth {
                &[]
            } else {
                &color_attachments
            };
            let _pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame graph clear"),
                color_attachments,
                depth_stencil_attachment: depth_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        } else if self
            .backend
            .device
            .features()
            .contains(wgpu::Features::CLEAR_TEXTURE)
        {
            self.encoder
                .clear_texture(&tex.texture, &wgpu::ImageSubresourceRange::default());
        } else {
            log::warn!(
                "wgpu: cannot clear storage texture {:?} without CLEAR_TEXTURE",
                buffer
            );
        }
    }
}
