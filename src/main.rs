use anyhow::Result;
use clap::Parser;
use std::fs::File;
use tokio::select;
use tracing::{info, level_filters::LevelFilter};
use voicehook::app::AppBuilder;
use voicehook::config::{Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = cli
        .conf
        .map(|conf| Config::load(&conf).expect("Failed to load config"))
        .unwrap_or_default()
        .with_env_overrides();

    let mut log_fmt = tracing_subscriber::fmt();
    if let Some(ref level) = config.log_level {
        if let Ok(lv) = level.as_str().parse::<LevelFilter>() {
            log_fmt = log_fmt.with_max_level(lv);
        }
    }

    if let Some(ref log_file) = config.log_file {
        let file = File::create(log_file).expect("Failed to create log file");
        let (non_blocking, _guard) = tracing_appender::non_blocking(file);
        log_fmt.with_writer(non_blocking).try_init().ok();
    } else {
        log_fmt.try_init().ok();
    }

    let app = AppBuilder::new().config(config).build()?;

    info!("Starting voicehook on {}", app.state.config.http_addr);
    select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received CTRL+C, shutting down");
        }
    }
    Ok(())
}
