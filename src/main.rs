// apex-import: import an exported APEX application script
//
// This is the main entry point for the apex-import binary. It is the only
// place that decides the process exit status.

use anyhow::Result;
use apex_import::cli::{init_logging, Cli};
use apex_import::config::ImportSettings;
use apex_import::database::OracleTransaction;
use apex_import::error::ImportError;
use apex_import::import::{read_script, run_import, Importer, ScriptRunner};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", err);
            if let Some(ImportError::MissingInput(_)) = err.downcast_ref::<ImportError>() {
                let _ = Cli::command().print_help();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = ImportSettings::resolve(cli.overrides())?;
    init_logging(settings.debug);

    let script = read_script(&settings.script)?;
    let target = settings.connection.connect_string()?;
    tracing::info!(
        database = %target.redacted(),
        script = %settings.script.display(),
        "Starting import"
    );

    let importer = Importer::new(
        ScriptRunner::new(settings.failure_file.clone()),
        settings.end_of_run,
    );
    let report = run_import(
        move || OracleTransaction::connect(&target),
        importer,
        settings.params,
        script,
    )
    .await?;

    tracing::info!(
        blocks = report.summary.blocks,
        executed = report.summary.executed,
        end_of_run = ?report.end_of_run,
        "Done"
    );
    Ok(())
}
