use std::process::ExitCode;

use clap::Parser;

use ciel_lib::Cli;
use ciel_lib::infrastructure::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  ciel_lib::run(cli).await
}
