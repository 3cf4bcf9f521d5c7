//! Log setup for the CLI.
//!
//! All modules log through the `log` facade; this module wires up the
//! `env_logger` backend once at startup. An explicit `RUST_LOG` wins over
//! the CLI flags, otherwise `-q` forces errors-only and each `-v` steps the
//! filter from info down through debug to trace.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Wire up the global logger. Call exactly once, before the first log line.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    // Debug builds get timestamps (and the module path at -v and above) so
    // scan phases can be correlated; release builds keep lines short.
    if cfg!(debug_assertions) {
        let with_module = verbose >= 1;
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            write!(
                buf,
                "{} {style}{:<5}{style:#} ",
                buf.timestamp_seconds(),
                record.level()
            )?;
            if with_module {
                write!(buf, "[{}] ", record.module_path().unwrap_or("unknown"))?;
            }
            writeln!(buf, "{}", record.args())
        });
    } else {
        builder.format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        });
    }

    builder.init();
}

/// Resolve the CLI flags into a level filter. Quiet beats verbose.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
