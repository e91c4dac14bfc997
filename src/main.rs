use clap::{Parser, Subcommand};
use follower_scraper_lib::{logger, Config, LookupService, RobloxClient};
use log::info;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "follower-scraper", about = "Look up a Roblox user's follower count")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one lookup and print the result as JSON
    Lookup {
        /// Roblox user id
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        user_id: u64,
    },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let service = LookupService::new(Arc::new(RobloxClient::new()?), &config);

    match cli.command {
        Command::Lookup { user_id } => {
            info!("Looking up user {}", user_id);
            let result = service.lookup(user_id);
            println!("{}", serde_json::to_string_pretty(&result)?);

            Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
