// ============================================================================
// scenecut-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the CLI
//
// The core library only talks to the `log` facade; this module installs the
// env_logger backend with a timestamped, level-coloured line format.
//
// USAGE:
// - default: info and above
// - --verbose: debug and above
// - RUST_LOG=...: overrides both (e.g. RUST_LOG=scenecut_core=trace)
//
// AI-ASSISTANT-INFO: Logging initialisation and timestamp helpers

// ---- External crate imports ----
use log::Level;
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::io::Write;

/// Check if color should be used (respects NO_COLOR environment variable)
pub fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Returns the current local time formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default filter for the given verbosity.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Initialises env_logger on stderr. Safe to call once per process.
pub fn init_logging(verbose: bool) {
    let color = should_use_color();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter(verbose)))
        .target(env_logger::Target::Stderr)
        .format(move |buf, record| {
            let level = if color {
                colored_level(record.level())
            } else {
                format!("{:<5}", record.level())
            };
            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                level,
                record.args()
            )
        })
        .init();
}

fn colored_level(level: Level) -> String {
    let label = format!("{level:<5}");
    match level {
        Level::Error => label.red().bold().to_string(),
        Level::Warn => label.yellow().to_string(),
        Level::Info => label.green().to_string(),
        Level::Debug => label.blue().to_string(),
        Level::Trace => label.magenta().to_string(),
    }
}
