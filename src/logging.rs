//! Process logger bootstrap.
//!
//! Diagnostics go through the `log` facade to stderr, so stdout carries only
//! the build summary. `RUST_LOG`, when set, overrides the level chosen from
//! the command line flags.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Log level spec for the `-v`/`-q` flags.
///
/// - default → `info`
/// - `-v` → `debug`, `-vv` and more → `trace`
/// - `-q` → `warn` (wins over `-v`)
pub fn level_spec(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Start the stderr logger. The returned handle must be kept alive for the
/// lifetime of the process.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(level_spec(verbose, quiet))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        assert_eq!(level_spec(0, false), "info");
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_spec(1, false), "debug");
        assert_eq!(level_spec(2, false), "trace");
        assert_eq!(level_spec(7, false), "trace");
    }

    #[test]
    fn quiet_wins() {
        assert_eq!(level_spec(0, true), "warn");
        assert_eq!(level_spec(2, true), "warn");
    }
}
