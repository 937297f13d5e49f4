use clap::Parser;
use inkdash::config::Settings;
use inkdash::core::{build_runtime, RefreshScheduler, ScheduleState};
use inkdash::drivers::{DisplayDriver, LogDriver, ScreenshotWriter};
use log::{error, info, warn};

/// inkdash - An e-paper dashboard for weather, commits, VPS usage, BTC and tasks
#[derive(Parser, Debug, Clone)]
#[command(name = "inkdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Run a single refresh cycle and exit
    #[arg(long = "once")]
    once: bool,

    /// Write frames to screenshot.bmp instead of the panel (overrides SCREENSHOT_MODE)
    #[arg(short = 's', long = "screenshot")]
    screenshot: bool,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting inkdash v{}", env!("CARGO_PKG_VERSION"));

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if cli.screenshot {
        settings.screenshot_mode = true;
    }
    settings.log_summary();

    let driver: Box<dyn DisplayDriver> = if settings.screenshot_mode {
        Box::new(ScreenshotWriter::default())
    } else {
        Box::new(LogDriver::new())
    };

    if let Err(e) = run(&settings, driver, cli.once) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(settings: &Settings, driver: Box<dyn DisplayDriver>, once: bool) -> anyhow::Result<()> {
    let mut scheduler = RefreshScheduler::from_settings(settings, driver)?;
    info!(
        "Display driver: {}, refresh every {:?}",
        scheduler.driver().name(),
        settings.refresh_interval
    );

    let runtime = build_runtime()?;

    runtime.block_on(async {
        if once {
            let (_, report) = scheduler.run_cycle(ScheduleState::new()).await;
            info!("Cycle finished: {:?}", report.outcome);
        } else {
            scheduler.run().await;
        }
    });
    Ok(())
}
