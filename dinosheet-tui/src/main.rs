mod app;
mod buffer;
mod cli;
mod draw;
mod input;
mod paths;
mod terminal;

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dinosheet_lib::feed::{FeedLoader, FileSource};
use dinosheet_lib::render::{RenderContext, to_plain_text};
use dinosheet_lib::{LoadState, Settings, Sheet};
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::cli::Cli;
use crate::terminal::Terminal;

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    }
}

async fn load_settings(path: Option<&PathBuf>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match Settings::load(path).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{}, using defaults", e);
            eprintln!("Warning: {}", e);
            Settings::default()
        }
    }
}

/// Loads the feed once and writes the print rendering to stdout.
async fn print_sheet(settings: &Settings) -> ExitCode {
    let loader = FeedLoader::new(FileSource::new(&settings.data_dir));
    let mut sheet = Sheet::new(settings);
    sheet.set_context(RenderContext::Print);

    let ticket = loader.begin(settings.feed_name());
    sheet.begin_load(&ticket);
    sheet.apply_load(loader.load(ticket).await);

    println!("{}", to_plain_text(sheet.table()));
    match sheet.load_state() {
        LoadState::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn run_tui(
    settings: &Settings,
    stored: Settings,
    settings_path: Option<PathBuf>,
) -> std::io::Result<()> {
    let (app, loads) = App::new(settings, stored, settings_path);
    let mut term = Terminal::new()?;
    app.run(&mut term, loads).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let settings_path = cli.config.clone().or_else(paths::settings_file);
    let stored = load_settings(settings_path.as_ref()).await;
    let mut settings = stored.clone();
    cli.apply(&mut settings);
    settings.overlay_margin.get_or_insert(draw::OVERLAY_MARGIN);
    info!(
        "Starting with variant {} from {}",
        settings.variant,
        settings.data_dir.display()
    );

    if cli.print {
        return print_sheet(&settings).await;
    }

    match run_tui(&settings, stored, settings_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
