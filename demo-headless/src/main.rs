use clap::Parser;
use snow_diorama_core::scene::euler_xyz;
use snow_diorama_core::{
    Clock, FaceCamera, FixedFrameScheduler, FrameScheduler, FrameTimer, IntegrationMode,
    ManualClock, PacedScheduler, RecordingRenderer, SceneConfig, SceneNode, Simulation,
    SystemClock, Vec3, Viewport,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Headless snow diorama with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "snow-diorama-demo")]
#[command(about = "Headless snow diorama simulation demo", long_about = None)]
struct Args {
    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Simulated display refresh rate in Hz
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Pace frames against the wall clock instead of simulating time
    #[arg(long)]
    realtime: bool,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Resize the viewport halfway through the run (e.g. 390x844)
    #[arg(long)]
    resize: Option<String>,

    /// Number of snow particles (overrides the config file)
    #[arg(short, long)]
    count: Option<usize>,

    /// Scale particle motion by frame time (60 Hz reference) instead of per frame
    #[arg(short, long)]
    time_scaled: bool,

    /// Seed for reproducible spawn points and velocities
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON scene configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report interval in frames
    #[arg(short, long, default_value_t = 60)]
    report_interval: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&Args::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    println!("=== Snow Diorama Demo ===\n");

    let config = scene_config(args)?;
    let viewport = Viewport::new(args.width, args.height, args.pixel_ratio)?;
    let resize = args.resize.as_deref().map(parse_size).transpose()?;

    println!(
        "Particles: {}, sphere radius {:.1} at height {:.1}, snow line {:.1}",
        config.count, config.sphere_radius, config.center_height, config.min_height
    );
    println!("Integration: {:?}", config.integration);
    println!("Viewport: {}x{} @ {:.1}x\n", args.width, args.height, args.pixel_ratio);

    if args.realtime {
        println!("Pacing {} frames at {:.1} Hz\n", args.frames, args.fps);
        let mut sim = build(args, config, viewport, SystemClock::new())?;
        let mut scheduler = PacedScheduler::new(args.fps, Some(args.frames));
        drive(args, &mut sim, &mut scheduler, resize, |_| {})?;
    } else {
        let dt = if args.fps > 0.0 { 1.0 / args.fps } else { 0.0 };
        let mut sim = build(args, config, viewport, ManualClock::new())?;
        let mut scheduler = FixedFrameScheduler::new(args.frames);
        drive(args, &mut sim, &mut scheduler, resize, |clock| clock.advance(dt))?;
    }
    Ok(())
}

fn scene_config(args: &Args) -> Result<SceneConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading scene config from {}", path.display());
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        }
        None => SceneConfig::default(),
    };

    if let Some(count) = args.count {
        config.count = count;
    }
    if args.time_scaled {
        config.integration = IntegrationMode::TimeScaled {
            reference_rate: snow_diorama_core::config::DEFAULT_REFERENCE_RATE,
        };
    }
    config.validate()?;
    Ok(config)
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> Result<(u32, u32), Box<dyn Error>> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}

fn build<C: Clock>(
    args: &Args,
    config: SceneConfig,
    viewport: Viewport,
    clock: C,
) -> Result<Simulation<C>, Box<dyn Error>> {
    let mut sim = match args.seed {
        Some(seed) => Simulation::with_seed(config, viewport, clock, seed)?,
        None => Simulation::new(config, viewport, clock)?,
    };

    // Stand-in for the loaded model's title card
    sim.scene_mut()
        .insert(SceneNode::new("title", Vec3::new(0.0, 4.5, 0.0)));
    sim.add_animator(FaceCamera::title());
    Ok(sim)
}

/// Tick `sim` once per frame granted by `scheduler`, timing every tick.
///
/// `advance_clock` runs before each tick; the simulated path steps its
/// manual clock there while the wall clock needs nothing. Returns the tick
/// timings.
fn drive<C: Clock>(
    args: &Args,
    sim: &mut Simulation<C>,
    scheduler: &mut dyn FrameScheduler,
    resize: Option<(u32, u32)>,
    mut advance_clock: impl FnMut(&mut C),
) -> Result<FrameTimer, Box<dyn Error>> {
    let mut renderer = RecordingRenderer::new();
    sim.attach(&mut renderer);

    let report_interval = args.report_interval.max(1);
    let resize_at = args.frames / 2 + 1;
    let mut timer = FrameTimer::new();
    let mut interval_respawns = 0;
    let mut frame = 0;

    println!("Frame | Time(s) | Respawns | Camera (x, z)    | Title yaw | Tick(ms)");
    println!("------|---------|----------|------------------|-----------|---------");

    while scheduler.next_frame() {
        frame += 1;

        if let Some((width, height)) = resize.filter(|_| frame == resize_at) {
            sim.resize(width, height, args.pixel_ratio, &mut renderer)?;
            println!(
                "-- resized to {}x{}, camera distance {:.2}",
                width,
                height,
                sim.camera_rig().distance()
            );
        }

        advance_clock(sim.clock_mut());
        let start = Instant::now();
        let stats = sim.tick(&mut renderer)?;
        timer.record(start.elapsed().as_secs_f64() * 1000.0);
        interval_respawns += stats.respawned;

        if frame % report_interval == 0 || frame == args.frames {
            report(sim, &renderer, stats.frame, stats.elapsed, interval_respawns, &timer);
            interval_respawns = 0;
        }
    }

    summary(sim, &renderer, &timer);
    Ok(timer)
}

fn report<C: Clock>(
    sim: &Simulation<C>,
    renderer: &RecordingRenderer,
    frame: u64,
    elapsed: f32,
    respawns: usize,
    timer: &FrameTimer,
) {
    let (cam_x, cam_z) = renderer
        .last_camera
        .map_or((0.0, 0.0), |c| (c.position.x, c.position.z));
    let yaw = sim
        .scene()
        .find("title")
        .map_or(0.0, |n| euler_xyz(&n.rotation).1.to_degrees());

    println!(
        "{:5} | {:7.2} | {:8} | ({:6.2}, {:6.2}) | {:8.1}° | {:7.3}",
        frame,
        elapsed,
        respawns,
        cam_x,
        cam_z,
        yaw,
        timer.average_frame_time_ms()
    );
}

fn summary<C: Clock>(sim: &Simulation<C>, renderer: &RecordingRenderer, timer: &FrameTimer) {
    let stats = sim.stats();
    let field = sim.field();

    let lowest = field
        .particles()
        .iter()
        .map(|p| p.position.y)
        .fold(f32::INFINITY, f32::min);
    let highest = field
        .particles()
        .iter()
        .map(|p| p.position.y)
        .fold(f32::NEG_INFINITY, f32::max);

    println!("\n=== Summary ===");
    println!("Frames: {}", stats.frames);
    println!(
        "Respawns: {} ({:.2} per frame)",
        stats.total_respawns,
        stats.mean_respawns_per_frame()
    );
    println!("Uploads: {}, renders: {}", renderer.uploads, renderer.renders);
    println!("Particle heights: {:.2} .. {:.2}", lowest, highest);
    println!("Camera distance: {:.2}", sim.camera_rig().distance());
    if timer.samples() > 0 {
        println!("Average tick: {:.3}ms", timer.average_frame_time_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let base = ["snow-diorama-demo", "--count", "50", "--seed", "7", "--frames", "6"];
        Args::parse_from(base.iter().chain(extra).copied())
    }

    #[test]
    fn test_realtime_ticks_are_timed() {
        let args = args(&["--realtime", "--fps", "1000"]);
        let config = scene_config(&args).unwrap();
        let viewport = Viewport::new(args.width, args.height, args.pixel_ratio).unwrap();
        let mut sim = build(&args, config, viewport, SystemClock::new()).unwrap();
        let mut scheduler = PacedScheduler::new(args.fps, Some(args.frames));

        let timer = drive(&args, &mut sim, &mut scheduler, None, |_| {}).unwrap();

        assert_eq!(timer.samples(), 6);
        assert_eq!(sim.stats().frames, 6);
    }

    #[test]
    fn test_simulated_run_resizes_halfway() {
        let args = args(&["--fps", "60"]);
        let config = scene_config(&args).unwrap();
        let viewport = Viewport::new(args.width, args.height, args.pixel_ratio).unwrap();
        let mut sim = build(&args, config, viewport, ManualClock::new()).unwrap();
        let mut scheduler = FixedFrameScheduler::new(args.frames);

        let timer = drive(&args, &mut sim, &mut scheduler, Some((640, 960)), |clock| {
            clock.advance(1.0 / 60.0);
        })
        .unwrap();

        assert_eq!(timer.samples(), 6);
        assert_eq!(sim.camera_rig().distance(), 21.0);
        assert!((sim.clock().elapsed_time() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("390x844").unwrap(), (390, 844));
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("ax10").is_err());
    }
}
