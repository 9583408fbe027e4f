use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use tapmath::application::ApplicationError;
use tapmath::cli::args::Cli;
use tapmath::cli::commands::execute_command;
use tapmath::cli::{output, CliError};
use tapmath::domain::DomainError;
use tapmath::infrastructure::InfraError;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        if is_catalog_failure(&e) {
            output::error(&"Failed to load math concepts. Please check the catalog files.");
        }
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn is_catalog_failure(e: &CliError) -> bool {
    matches!(
        e,
        CliError::Infra(InfraError::Application(
            ApplicationError::CatalogMissing(_)
                | ApplicationError::CatalogLoad { .. }
                | ApplicationError::Domain(DomainError::DuplicateConcept(_))
        ))
    )
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
