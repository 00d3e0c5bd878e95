use clap::Parser;
use log::info;
use neurite::{
    canvas::NullCanvas,
    driver::{input_channel, Driver, InputEvent},
    params::WorldParams,
    svg::SvgCanvas,
    ticker::{CountdownTicker, Ticker},
    world::create_world,
    Point,
};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Parser)]
#[command(name = "neurite-headless")]
#[command(version)]
#[command(about = "Run the neuron growth simulation without a display")]
struct Cli {
    /// World parameters (YAML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value = "600")]
    frames: u64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width override
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height override
    #[arg(long)]
    height: Option<f64>,

    /// Write the last frame, trails included, as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the final world state as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Move the pointer along a circle around the canvas centre
    #[arg(long)]
    orbit_pointer: bool,

    /// Click at the pointer every N frames
    #[arg(long)]
    click_every: Option<u64>,
}

/// Countdown ticker that feeds synthetic pointer input ahead of each frame.
struct ScriptedInput {
    ticks: CountdownTicker,
    tx: Sender<InputEvent>,
    frame: u64,
    center: Point,
    orbit_radius: f64,
    orbit_pointer: bool,
    click_every: Option<u64>,
}

impl ScriptedInput {
    fn pointer(&self) -> Point {
        let angle = self.frame as f64 * 0.01;
        Point::new(
            self.center.x + self.orbit_radius * angle.cos(),
            self.center.y + self.orbit_radius * angle.sin(),
        )
    }

    fn send(&self, event: InputEvent) {
        // receiver lives in the driver, which outlives the ticker
        self.tx.send(event).ok();
    }
}

impl Ticker for ScriptedInput {
    fn wait_tick(&mut self) -> bool {
        if !self.ticks.wait_tick() {
            return false;
        }

        let pointer = if self.orbit_pointer {
            let pointer = self.pointer();
            self.send(InputEvent::PointerMove {
                x: pointer.x,
                y: pointer.y,
            });
            pointer
        } else {
            self.center
        };

        if let Some(every) = self.click_every.filter(|every| *every > 0) {
            if self.frame > 0 && self.frame % every == 0 {
                self.send(InputEvent::Click {
                    x: pointer.x,
                    y: pointer.y,
                });
            }
        }

        self.frame += 1;
        true
    }
}

fn load_params(cli: &Cli) -> Result<WorldParams, Box<dyn Error>> {
    let mut params = match &cli.config {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => WorldParams::default(),
    };

    if let Some(seed) = cli.seed {
        params.technical_params.seed_override = Some(seed);
    }

    if let Some(width) = cli.width {
        params.canvas_params.width = width;
    }

    if let Some(height) = cli.height {
        params.canvas_params.height = height;
    }

    Ok(params)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let params = load_params(&cli)?;
    let mut world = create_world(params)?;

    let (width, height) = world.dimensions();
    let seed_count = world.params().population_params.seed_count;
    let seeded = world.seed(seed_count);

    info!("=== neurite headless run ===");
    info!("Canvas: {}x{}", width, height);
    info!("Seed: {}", world.seed_value());
    info!("Initial neurons: {}", seeded);
    info!("Frames: {}", cli.frames);

    let (tx, rx) = input_channel();
    let mut ticker = ScriptedInput {
        ticks: CountdownTicker::new(cli.frames),
        tx,
        frame: 0,
        center: Point::new(width / 2.0, height / 2.0),
        orbit_radius: 0.35 * width.min(height),
        orbit_pointer: cli.orbit_pointer,
        click_every: cli.click_every,
    };

    let mut driver = Driver::new(world, rx);

    let summary = match &cli.svg {
        Some(path) => {
            let mut canvas = SvgCanvas::new(width, height);
            let summary = driver.run(&mut canvas, &mut ticker);
            fs::write(path, canvas.to_string())?;
            info!("Wrote {} SVG elements to {}", canvas.num_elements(), path.display());
            summary
        }
        None => driver.run(&mut NullCanvas, &mut ticker),
    };

    for line in summary.to_string().lines() {
        info!("{}", line);
    }

    if let Some(path) = &cli.snapshot {
        let snapshot = driver.world().snapshot();
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        info!("Wrote snapshot of frame {} to {}", snapshot.frame, path.display());
    }

    Ok(())
}
