//! Vehicle service intake bot: collects service requests over Telegram and
//! forwards them to the service team's chat.

mod bootstrap_helpers;
mod cli_args;
mod startup;

use anyhow::Result;
use clap::Parser;

use crate::{bootstrap_helpers::init_tracing, cli_args::Cli, startup::run_bot};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    run_bot(cli).await
}
