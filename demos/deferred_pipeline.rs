//! Deferred pipeline walkthrough on the dummy backend.
//!
//! Builds a G-buffer / SSAO / lighting / water / TAA / tonemap pipeline,
//! runs it for a number of frames and prints every transition and clear the
//! frame graph encodes, plus per-frame statistics.
//!
//! ```bash
//! cargo run --example deferred_pipeline -- --frames 3 --resize-at 2
//! RUST_LOG=trace cargo run --example deferred_pipeline
//! ```

use clap::Parser;

use redlilium_framegraph::{
    BufferHandle, DummyBackend, Extent2d, FrameGraphConfig, GraphExecutor, GraphResult,
    RecordingSink, ResourceDescriptor, SinkCommand, SlotId, StageDescriptor, TextureFormat,
    ViewHandle,
};

const GBUFFER: SlotId = SlotId::new(0);
const DEPTH: SlotId = SlotId::new(1);
const AMBIENT_OCCLUSION: SlotId = SlotId::new(2);
const LIGHT_RESULT: SlotId = SlotId::new(3);
const TAA_HISTORY: SlotId = SlotId::new(4);

const SWAPCHAIN: BufferHandle = BufferHandle::new(u64::MAX);

/// Frame graph demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "deferred_pipeline",
    about = "Runs a deferred rendering pipeline through the frame graph"
)]
struct Args {
    /// Number of frames to run.
    #[arg(long, default_value = "2")]
    frames: u64,

    /// Canvas width in pixels.
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value = "720")]
    height: u32,

    /// Resize the canvas to half size before this frame.
    #[arg(long)]
    resize_at: Option<u64>,

    /// Render SSAO at this fraction of the canvas.
    #[arg(long, default_value = "0.5")]
    ssao_scale: f32,

    /// Do not share scratch buffers between stages.
    #[arg(long)]
    no_scratch_reuse: bool,

    /// Only print statistics, not individual commands.
    #[arg(long)]
    quiet: bool,
}

fn build_pipeline(ssao_scale: f32) -> Vec<StageDescriptor> {
    let hdr = ResourceDescriptor::color(TextureFormat::Rgba16Float).with_label("LightResult");

    vec![
        StageDescriptor::new("GBuffer")
            .write(
                GBUFFER,
                ResourceDescriptor::color(TextureFormat::Rgba8Unorm).with_label("GBuffer0"),
            )
            .write(
                DEPTH,
                ResourceDescriptor::depth(TextureFormat::Depth32Float).with_label("Depth"),
            ),
        StageDescriptor::new("LinearDepth")
            .read(DEPTH)
            .write_next(ResourceDescriptor::storage(TextureFormat::R32Float)),
        StageDescriptor::new("Ssao")
            .read_previous(0)
            .read(GBUFFER)
            .write(
                AMBIENT_OCCLUSION,
                ResourceDescriptor::storage(TextureFormat::R8Unorm)
                    .with_resolution_rate(ssao_scale),
            )
            .with_scratch(
                ResourceDescriptor::storage(TextureFormat::R8Unorm)
                    .with_resolution_rate(ssao_scale),
            ),
        StageDescriptor::new("Lighting")
            .read(GBUFFER)
            .read(AMBIENT_OCCLUSION)
            .read(DEPTH)
            .write(LIGHT_RESULT, hdr.clone()),
        StageDescriptor::new("Water")
            .read(DEPTH)
            .write(LIGHT_RESULT, hdr),
        StageDescriptor::new("Taa")
            .read(LIGHT_RESULT)
            .read_history(TAA_HISTORY, 1)
            .write(
                TAA_HISTORY,
                ResourceDescriptor::color(TextureFormat::Rgba16Float)
                    .with_label("TaaHistory")
                    .with_history(1),
            ),
        StageDescriptor::new("Tonemap")
            .read(TAA_HISTORY)
            .present_to(0),
    ]
}

fn run_frame(
    executor: &mut GraphExecutor,
    backend: &mut DummyBackend,
    sink: &mut RecordingSink,
    stages: &[StageDescriptor],
    quiet: bool,
) -> GraphResult<()> {
    executor.make_resources(backend, stages)?;
    executor.set_present_surface(
        SWAPCHAIN,
        ViewHandle::new(0),
        executor.canvas(),
        TextureFormat::Bgra8UnormSrgb,
    );

    for (index, stage) in stages.iter().enumerate() {
        executor.record_transitions(index, sink)?;
        if !quiet {
            println!("  [{}]", stage.name());
            for command in sink.take() {
                match command {
                    SinkCommand::Transition(directive) => println!(
                        "    {:?}: {:?} -> {:?}",
                        directive.buffer, directive.before, directive.after
                    ),
                    SinkCommand::Clear(buffer) => println!("    clear {:?}", buffer),
                }
            }
        }
        sink.clear();
    }

    if let Some(directive) = executor.finish_presentation() {
        if !quiet {
            println!("  [present] {:?} -> {:?}", directive.before, directive.after);
        }
    }
    executor.end_frame(backend);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    redlilium_framegraph::init();

    let args = Args::parse();
    let config = FrameGraphConfig {
        reuse_scratch: !args.no_scratch_reuse,
        ..FrameGraphConfig::with_canvas(args.width, args.height)
    };

    let stages = build_pipeline(args.ssao_scale);
    let mut backend = DummyBackend::new();
    let mut sink = RecordingSink::new();
    let mut executor = GraphExecutor::new(config);

    for frame in 0..args.frames {
        if args.resize_at == Some(frame) {
            let canvas = executor.canvas();
            let half = Extent2d::new((canvas.width / 2).max(1), (canvas.height / 2).max(1));
            executor.resize(&mut backend, half);
        }

        println!("frame {} ({})", frame, executor.canvas());
        if let Err(err) = run_frame(&mut executor, &mut backend, &mut sink, &stages, args.quiet) {
            log::error!("frame {} failed: {}", frame, err);
            break;
        }

        let stats = executor.stats();
        println!(
            "  {} resources, {} buffers, {} KiB live",
            stats.resources,
            stats.buffers,
            backend.used_bytes() / 1024
        );
    }

    executor.destroy(&mut backend);
    log::info!(
        "done: {} allocations, {} destroyed, {} live",
        backend.allocation_count(),
        backend.destroyed_count(),
        backend.live_buffer_count()
    );
}
