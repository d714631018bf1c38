mod commands;
mod config;
mod main_lib;

use commands::Command;
use config::Config;
use main_lib::{init_tracing, select_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}\n\n{}", message, commands::USAGE);
            std::process::exit(2);
        }
    };

    let backend = select_backend(&config).await?;
    tracing::info!("Storage: {}", backend.mode);

    let output = commands::run(command, &backend, dairy_core::utils::time_utils::today()).await?;
    println!("{}", output);
    Ok(())
}
