// Entrypoint for the importer.
// - Argument errors (missing file argument, unknown type) are reported by
//   clap before anything touches the network.
// - Any error from the run ends the process with a non-zero status.

use clap::Parser;
use inventory_importer::{
    api::ApiClient, cli::Cli, config::Settings, logging, ui::TerminalOperator,
    workflow::run_import,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize();

    let settings = Settings::from_env();
    let mut api = ApiClient::new(&settings.api_url)?;

    let mut operator = TerminalOperator::stdin();
    run_import(&mut api, &mut operator, &settings, &cli.file, cli.import_type)?;
    println!("\nImport completed successfully!");
    Ok(())
}
