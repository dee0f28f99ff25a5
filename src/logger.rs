//! Logger module for the search API
//!
//! Colored stdout backend over the `log` facade. The default level comes
//! from the `LOG_LEVEL` configuration value; per-target overrides can be
//! set via a RUST_LOG-like spec, e.g. `RUST_LOG=debug,reqwest=warn`.
use std::sync::OnceLock;

use colored::Colorize;
use log::{Level, LevelFilter, Log};

use crate::config::get_config;

struct Logger {
    default: LevelFilter,
    // (target_prefix, filter), e.g., ("html5ever", Warn), ("websearch_api", Trace)
    overrides: Vec<(String, LevelFilter)>,
}

impl Logger {
    fn effective_filter(&self, target: &str) -> LevelFilter {
        // Longest-prefix match like env_logger
        let mut best: Option<(&str, LevelFilter)> = None;
        for (prefix, lf) in &self.overrides {
            if target.starts_with(prefix) {
                match best {
                    None => best = Some((prefix, *lf)),
                    Some((prev, _)) if prefix.len() > prev.len() => best = Some((prefix, *lf)),
                    _ => {}
                }
            }
        }
        best.map(|(_, lf)| lf).unwrap_or(self.default)
    }

    fn level_allowed(level: Level, filter: LevelFilter) -> bool {
        match filter {
            LevelFilter::Off => false,
            LevelFilter::Error => level <= Level::Error,
            LevelFilter::Warn => level <= Level::Warn,
            LevelFilter::Info => level <= Level::Info,
            LevelFilter::Debug => level <= Level::Debug,
            LevelFilter::Trace => true,
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let filter = self.effective_filter(metadata.target());
        Self::level_allowed(metadata.level(), filter)
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);

            let text = match record.level() {
                log::Level::Error => {
                    format!("{} {}:{} - {}", "[ERROR]".red(), file, line, record.args())
                }
                log::Level::Warn => format!(
                    "{} {}:{} - {}",
                    "[WARN]".yellow(),
                    file,
                    line,
                    record.args()
                ),
                log::Level::Info => {
                    format!("{} {}:{} - {}", "[INFO]".green(), file, line, record.args())
                }
                log::Level::Debug => {
                    format!("{} {}:{} - {}", "[DEBUG]".blue(), file, line, record.args())
                }
                log::Level::Trace => format!(
                    "{} {}:{} - {}",
                    "[TRACE]".purple(),
                    file,
                    line,
                    record.args()
                ),
            };
            println!("{}", text);
        }
    }

    fn flush(&self) {}
}

// Noisy dependencies stay quiet unless explicitly raised.
const DEFAULT_RUST_LOG: &str = "html5ever=warn,selectors=warn,reqwest=warn,hyper=warn";

/// Parse RUST_LOG-like specs: e.g. "info,html5ever=off,websearch_api=trace"
fn parse_filters(default: LevelFilter) -> (LevelFilter, Vec<(String, LevelFilter)>) {
    let mut default = default;
    let mut overrides: Vec<(String, LevelFilter)> = Vec::new();

    let env_spec = std::env::var("RUST_LOG").unwrap_or_default();
    for part in DEFAULT_RUST_LOG
        .split(',')
        .chain(env_spec.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if let Some((target, lvl)) = part.split_once('=') {
            let lf = parse_level_filter(lvl).unwrap_or(LevelFilter::Info);
            let name = target.trim().to_string();

            if let Some(index) = overrides.iter().position(|raw| raw.0 == name) {
                overrides[index] = (name, lf);
            } else {
                overrides.push((name, lf));
            }
        } else {
            default = parse_level_filter(part).unwrap_or(default);
        }
    }

    (default, overrides)
}

fn parse_level_filter(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Initializes the logger
///
/// The default level comes from `LOG_LEVEL` (INFO when unset); per-target
/// overrides from `RUST_LOG`, e.g. `RUST_LOG=websearch_api=trace`.
pub fn init_logger() {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let (default, overrides) = parse_filters(get_config().log_level().to_level_filter());

    // Set global max to the highest level we might emit (so overrides can work).
    let global_max = std::iter::once(default)
        .chain(overrides.iter().map(|(_, lf)| *lf))
        .max()
        .unwrap_or(LevelFilter::Info);

    log::set_logger(LOGGER.get_or_init(|| Logger { default, overrides }))
        .map(|()| log::set_max_level(global_max))
        .expect("Failed to set logger");

    log::debug!("Logger initialized");
}
