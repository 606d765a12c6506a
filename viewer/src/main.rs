use anyhow::Context;
use clap::Parser;
use generator::profile::{write_log, GeneratorConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use workflow::config::{SourceArgs, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Live and replay viewer for multi-zone ToF sensors")]
struct Args {
    /// Read frames from the sensor over a serial port
    #[arg(short = 'l', long, conflicts_with = "replay")]
    live: bool,
    /// Play back a recorded log
    #[arg(long)]
    replay: bool,
    /// Serial port, e.g. COM3 or /dev/ttyACM0
    #[arg(short = 'p')]
    port: Option<String>,
    /// Baud rate, e.g. 115200
    #[arg(short = 'b')]
    baud: Option<u32>,
    /// Where to save the captured log
    #[arg(short = 'o')]
    output: Option<PathBuf>,
    /// Log to replay
    #[arg(short = 'i')]
    input: Option<PathBuf>,
    /// Playback frequency in Hz
    #[arg(short = 'f')]
    frequency: Option<u32>,
    /// Load the whole session from YAML instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address of the frame bridge
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Write a synthetic replay log to this path and exit
    #[arg(long)]
    generate: Option<PathBuf>,
    #[arg(long, default_value_t = 100)]
    frames: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = args.generate {
        let config = GeneratorConfig {
            frames: args.frames,
            seed: args.seed,
            ..Default::default()
        };
        let written = write_log(&path, &config)?;
        println!("Wrote {} synthetic readings to {}", written, path.display());
        return Ok(());
    }

    let mut workflow_config = if let Some(path) = args.config {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(SourceArgs {
            live: args.live,
            replay: args.replay,
            port: args.port,
            baud: args.baud,
            output: args.output,
            input: args.input,
            frequency: args.frequency,
        })?
    };
    if let Some(bind) = args.bind {
        workflow_config.bind = bind;
    }
    workflow_config
        .session
        .validate()
        .context("checking session config")?;

    let result = Runner::new(workflow_config).execute()?;
    println!(
        "Session ended -> frames {}, decoded {}, dropped {}, published {}",
        result.rendered_frames,
        result.metrics.decoded,
        result.metrics.dropped,
        result.metrics.published
    );

    Ok(())
}
