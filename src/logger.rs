use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;
use std::path::Path;

use crate::domain::fog_system_model::utils::statistics::ANALYTICS_TARGET;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "simulation.log";
const LEVEL_ENV: &str = "RUST_LOG";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn level_from_env() -> LevelFilter {
    std::env::var(LEVEL_ENV).ok().and_then(|level| level.parse().ok()).unwrap_or(LevelFilter::Info)
}

/// Human facing output. Analytics events only go to the file.
fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .filter(|metadata| metadata.target() != ANALYTICS_TARGET)
        .format(move |out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr())
}

fn file_dispatch(path: &Path) -> Option<Dispatch> {
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory '{}': {}", dir.display(), e);
            return None;
        }
    }

    match fern::log_file(path) {
        Ok(file) => Some(
            Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), record.level(), record.target(), message))
                })
                .chain(file),
        ),
        Err(e) => {
            eprintln!("Failed to open log file '{}': {}", path.display(), e);
            None
        }
    }
}

/// Installs the global logger: colored stderr plus `logs/simulation.log`.
///
/// The level is read from `RUST_LOG` and falls back to `info`. Call once from `main`.
pub fn init() {
    let log_file_path = Path::new(LOG_DIR).join(LOG_FILE);

    let mut dispatch = Dispatch::new().level(level_from_env()).level_for("serde", LevelFilter::Warn).chain(console_dispatch());
    let file = file_dispatch(&log_file_path);
    let to_file = file.is_some();
    if let Some(file) = file {
        dispatch = dispatch.chain(file);
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to install logger: {}", e);
        return;
    }

    if to_file {
        log::info!("Logging to stderr and '{}'.", log_file_path.display());
    } else {
        log::info!("Logging to stderr only.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_dispatch_creates_missing_directories() {
        let dir = std::env::temp_dir().join(format!("fog-sim-logger-{}", std::process::id()));
        let path = dir.join("nested").join(LOG_FILE);

        assert!(file_dispatch(&path).is_some());
        assert!(path.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_dispatch_gives_up_on_unusable_path() {
        let blocker = std::env::temp_dir().join(format!("fog-sim-logger-blocker-{}", std::process::id()));
        fs::write(&blocker, "not a directory").unwrap();

        assert!(file_dispatch(&blocker.join(LOG_FILE)).is_none());
        fs::remove_file(&blocker).unwrap();
    }
}
