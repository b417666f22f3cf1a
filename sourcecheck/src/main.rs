//! sourcecheck Entry Point

use clap::Parser;
use sourcecheck::cli::{show, Cli, Commands};
use sourcecheck::progress::{render_summary, write_summary};
use sourcecheck::{logging, runner, SourceCheckError};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let summary = match cli.command {
        Some(Commands::Show(args)) => show::execute(&args)
            .await
            .unwrap_or_else(|e| fail("Failed to show report", e)),
        None => {
            let config = cli.run.to_config();
            let output = runner::execute(&config)
                .await
                .unwrap_or_else(|e| fail("Probe run failed", e));
            render_summary(&output.report, &config.report_path, cli.run.top)
        }
    };

    if let Err(e) = write_summary(&mut std::io::stdout().lock(), &summary) {
        fail("Failed to print summary", e);
    }
}

fn fail(context: &str, e: SourceCheckError) -> ! {
    error!(error = %e, "{}", context);
    eprintln!("Error: {}", e);
    std::process::exit(1);
}
