use std::io::Write;

use log::LevelFilter;

/// Writes log records to stderr as `[file:line] LEVEL: message`.
pub struct Logger;

static LOGGER: Logger = Logger;

impl Logger {
    /// Install the logger. Only warnings and errors are shown unless
    /// `verbose` is set.
    pub fn init(verbose: bool) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            });
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr().lock(),
                "[{}:{}] {}: {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
