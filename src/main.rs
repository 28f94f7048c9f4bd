use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

mod controller;
mod domain;
mod engine;
mod inputter;
mod model;
mod source;
mod ui;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use controller::Controller;
use domain::{CastError, Config};
use model::{Model, Status};
use ui::CastUI;

#[derive(Parser, Debug)]
#[command(
    name = "cast",
    about = "A tui based browser for show cast records.",
    version
)]
struct Cli {
    /// Cast records file (csv, parquet or arrow)
    path: String,
    /// Initial page size, must be one of the configured options
    #[arg(long)]
    page_size: Option<usize>,
    /// Write logs to this file (stdout belongs to the tui)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log filter, e.g. "info" or "cast=trace"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), CastError> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run() -> Result<(), CastError> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = Config::default();
    if let Some(size) = cli.page_size {
        if !config.page_sizes.contains(&size) {
            return Err(CastError::InvalidPageSize(size));
        }
        config.default_page_size = size;
    }

    let path = shellexpand::full(&cli.path)
        .map_err(|e| CastError::LoadingFailed(format!("Bad path: {e}")))?
        .to_string();

    let mut terminal = ratatui::init();
    let mut model = Model::init(&config)?;
    model.load_data_file(PathBuf::from(path));

    let ui = CastUI::new();
    let controller = Controller::new(&config);

    info!("Entering main loop ...");
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events, map them to a Message and let the model react
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}
