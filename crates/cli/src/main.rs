use anyhow::Context;
use clap::Parser;

use stockroom_cli::Cli;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    stockroom_observability::init_with(cli.log_format, "warn");

    let config = cli.store_config().context("invalid configuration")?;
    tracing::debug!(workbook = %config.workbook_path.display(), "configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    stockroom_cli::run(cli.command, &config, &mut out)
}
