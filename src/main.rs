use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use clickstream_analytics::cli::{Cli, Commands};
use clickstream_analytics::config::{get_config, init_config_from};
use clickstream_analytics::runtime::modes;
use clickstream_analytics::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // .env 中的 AN__* 变量参与配置加载
    dotenvy::dotenv().ok();
    init_config_from(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = get_config();
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = modes::run_server().await {
                error!("Server exited with error: {:#}", e);
                eprintln!("Server error: {:#}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        cmd => match modes::run_cli(cmd).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e.format_colored());
                ExitCode::FAILURE
            }
        },
    }
}
