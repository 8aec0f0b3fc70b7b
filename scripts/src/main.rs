use clap::Parser;
use crypto_devs_scripts::{cli::Cli, errors::ScriptError};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    cli.run().await
}
