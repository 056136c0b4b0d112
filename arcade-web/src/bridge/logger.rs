//! Console logger - `log` records to the browser devtools console

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// One console line per record
fn format_record(level: Level, target: &str, message: &str) -> String {
    // Module path is noise for everything but debug output
    if level >= Level::Debug {
        format!("[{}] {}", target, message)
    } else {
        message.to_string()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.target(), &record.args().to_string());
        let line = wasm_bindgen::JsValue::from_str(&line);
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger (once) and set the max level
pub fn init_logger(level: LevelFilter) {
    // Already installed on a second call; only the level changes
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_lines_carry_target() {
        assert_eq!(
            format_record(Level::Debug, "arcade_web::modes", "sliced"),
            "[arcade_web::modes] sliced"
        );
        assert_eq!(format_record(Level::Warn, "arcade_web::engine", "pose not sent"), "pose not sent");
    }
}
