mod config;
mod session;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tiltcast_common::{Angle, Position};
use tiltcast_input::{ConstantTilt, ScriptedTilt, TiltSample, TiltSource, parse_script};
use tiltcast_kernel::{GridMap, Player, World};
use tiltcast_render::{FrameRenderer, Framebuffer, PixelFormat, RayResult, cast_ray};
use tiltcast_tools::Inspector;

use crate::config::EngineConfig;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "tiltcast", about = "Tilt-driven fixed-point raycaster")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML engine configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Text map (`#` solid, `.` empty) instead of a generated one
    #[arg(short, long, global = true)]
    map: Option<PathBuf>,

    /// Override the map seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Walk through walls
    #[arg(long, global = true)]
    noclip: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the effective configuration
    Info,
    /// Cast a single ray and print what it hits
    Cast {
        /// Origin x in sub-units
        #[arg(allow_hyphen_values = true)]
        x: i32,
        /// Origin y in sub-units
        #[arg(allow_hyphen_values = true)]
        y: i32,
        /// Ray angle on the 16-bit circle
        #[arg(allow_hyphen_values = true)]
        angle: i32,
    },
    /// Render one frame from the entrance (or a given pose)
    Render {
        /// Player x in sub-units
        #[arg(long, allow_hyphen_values = true)]
        x: Option<i32>,
        /// Player y in sub-units
        #[arg(long, allow_hyphen_values = true)]
        y: Option<i32>,
        /// Facing on the 16-bit circle
        #[arg(long, allow_hyphen_values = true)]
        facing: Option<i32>,
        /// Write a PBM/PPM image here instead of printing ASCII
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pixels per ASCII character, horizontally
        #[arg(long, default_value = "2")]
        cell_w: usize,
        /// Pixels per ASCII character, vertically
        #[arg(long, default_value = "4")]
        cell_h: usize,
    },
    /// Run fixed-period ticks under a tilt script, then check replay
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        /// Tilt script; constant tilt is used when absent
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Constant forward tilt when no script is given
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        forward: i16,
        /// Constant turn tilt when no script is given
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        turn: i16,
        /// Sleep out each tick period instead of running flat out
        #[arg(long)]
        realtime: bool,
        /// Summary format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.map.seed = seed;
    }
    if cli.noclip {
        config.movement.noclip = true;
    }
    Ok(config)
}

fn load_map(path: Option<&Path>, config: &EngineConfig) -> anyhow::Result<GridMap> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading map {}", path.display()))?;
            let map = text
                .parse::<GridMap>()
                .with_context(|| format!("parsing map {}", path.display()))?;
            Ok(map)
        }
        None => Ok(config.map.generate()),
    }
}

fn run_session<T: TiltSource>(
    mut session: Session<T>,
    ticks: u64,
    realtime: bool,
    format: Format,
) -> anyhow::Result<()> {
    let last = session.run(ticks, realtime);
    let replay_ok = session.verify_replay();
    let summary = Inspector::summary(session.world());
    let timer = session.timer();

    match format {
        Format::Text => {
            println!("{summary}");
            if let Some(report) = last {
                println!(
                    "last frame: hit={} missed={} wall_pixels={} nearest={:?}",
                    report.stats.columns_hit,
                    report.stats.columns_missed,
                    report.stats.wall_pixels,
                    report.stats.nearest
                );
            }
            println!(
                "frame time: avg={:?} min={:?} max={:?} over_budget={} (budget {:?})",
                timer.average(),
                timer.min(),
                timer.max(),
                timer.over_budget(),
                timer.budget()
            );
            println!("replay: {}", if replay_ok { "OK" } else { "MISMATCH" });
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    anyhow::ensure!(replay_ok, "replay diverged from live run");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;
    let map = load_map(cli.map.as_deref(), &config)?;
    tracing::debug!(size = map.size(), solid = map.solid_count(), "map ready");

    match cli.command {
        Commands::Info => {
            println!("tiltcast v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tiltcast_common::crate_info());
            println!("kernel: {}", tiltcast_kernel::crate_info());
            println!("input: {}", tiltcast_input::crate_info());
            println!("render: {}", tiltcast_render::crate_info());
            println!("tools: {}", tiltcast_tools::crate_info());
            println!(
                "map: {}x{}, {} solid",
                map.size(),
                map.size(),
                map.solid_count()
            );
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Commands::Cast { x, y, angle } => {
            let origin = Position::new(x, y);
            let angle = Angle::from_raw(angle);
            match cast_ray(&map, origin, angle) {
                RayResult::Hit { distance, offset } => {
                    println!("hit: distance={distance} offset={offset}");
                }
                RayResult::Miss => println!("miss"),
            }
        }
        Commands::Render {
            x,
            y,
            facing,
            out,
            cell_w,
            cell_h,
        } => {
            let entrance = Player::at_entrance(map.size());
            let player = Player::new(
                Position::new(
                    x.unwrap_or(entrance.position.x),
                    y.unwrap_or(entrance.position.y),
                ),
                facing.map_or(entrance.facing, Angle::from_raw),
            );
            let world = World::new(map, player, config.movement);
            let mut framebuffer =
                Framebuffer::new(config.pixel_format, config.viewport, config.palette);
            let stats = FrameRenderer::default().render(&world, &mut framebuffer);
            tracing::info!(
                hit = stats.columns_hit,
                missed = stats.columns_missed,
                "frame rendered"
            );

            match out {
                Some(path) => {
                    std::fs::write(&path, framebuffer.to_netpbm())
                        .with_context(|| format!("writing {}", path.display()))?;
                    let kind = match framebuffer.format() {
                        PixelFormat::PackedMono => "PBM",
                        PixelFormat::Indexed => "PPM",
                    };
                    println!("wrote {kind} to {}", path.display());
                }
                None => print!("{}", framebuffer.ascii(cell_w.max(1), cell_h.max(1))),
            }
        }
        Commands::Run {
            ticks,
            script,
            forward,
            turn,
            realtime,
            format,
        } => match script {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading script {}", path.display()))?;
                let samples = parse_script(&text)
                    .with_context(|| format!("parsing script {}", path.display()))?;
                tracing::info!(samples = samples.len(), "loaded tilt script");
                let session = Session::new(&config, map, ScriptedTilt::new(samples));
                run_session(session, ticks, realtime, format)?;
            }
            None => {
                let tilt = ConstantTilt(TiltSample::new(forward, turn));
                run_session(Session::new(&config, map, tilt), ticks, realtime, format)?;
            }
        },
    }

    Ok(())
}
