use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;
use tracing::{error, info, warn};

use pagesmith::builder::{BuilderPlugin, BuilderState};
use pagesmith::config::ConfigPlugin;
use pagesmith::page::{
    CurrentPage, LoadPageRequest, PageDirtyState, PageLoadError, PagePlugin, PageSaveError,
    SavePageRequest,
};
use pagesmith::script::{apply_script, load_script};

/// Set up file logging for debug builds
#[cfg(debug_assertions)]
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    // Create logs directory if it doesn't exist
    let logs_dir = pagesmith::paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join("pagesmith.log");

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, "pagesmith.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Configure file layer (no ANSI colors for file output)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    // Default to info for dependencies, debug for pagesmith
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pagesmith=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(guard)
}

/// Release builds log to stdout only
#[cfg(not(debug_assertions))]
fn setup_logging() -> Option<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    None
}

/// Log the component tree as an indented outline
fn log_outline(state: &BuilderState) {
    info!(
        "Page has {} component(s), {} undoable action(s)",
        state.tree().len(),
        state.history().visible_actions().len()
    );
    for (depth, component) in state.tree().walk() {
        let marker = if state.is_selected(&component.id) { "*" } else { "-" };
        info!(
            "{}{} {} [{}] {}",
            "  ".repeat(depth),
            marker,
            component.display_name,
            component.component_type.tag(),
            component.id
        );
    }
}

fn main() -> ExitCode {
    // Keep the guard alive for the duration of the program
    let _log_guard = setup_logging();
    if let Err(e) = pagesmith::paths::ensure_directories() {
        warn!("Failed to create data directories: {}", e);
    }

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let page_path = args.next();
    let script_path = args.next();

    let mut app = App::new();
    app.add_plugins((ConfigPlugin, BuilderPlugin, PagePlugin));
    app.update();

    if let Some(path) = page_path.as_ref().filter(|p| p.exists()) {
        app.world_mut()
            .write_message(LoadPageRequest { path: path.clone() });
        app.update();
        if let Some(message) = &app.world().resource::<PageLoadError>().message {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = script_path {
        let steps = match load_script(&path) {
            Ok(steps) => steps,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        let report = apply_script(&mut app.world_mut().resource_mut::<BuilderState>(), &steps);
        info!(
            "Applied {} step(s), skipped {}, rejected {}",
            report.applied,
            report.skipped,
            report.rejected.len()
        );
        app.update();
    }

    log_outline(app.world().resource::<BuilderState>());

    let Some(path) = page_path else {
        return ExitCode::SUCCESS;
    };
    if !app.world().resource::<PageDirtyState>().is_dirty
        && app.world().resource::<CurrentPage>().path.is_some()
    {
        info!("No changes to save");
        return ExitCode::SUCCESS;
    }

    app.world_mut().write_message(SavePageRequest { path });
    app.update();
    // Flush the config update the save requested
    app.update();
    match &app.world().resource::<PageSaveError>().message {
        Some(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
