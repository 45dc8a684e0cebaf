//! Logging setup for desktop hosts and offline tools
//!
//! Units only log from non-real-time paths (INIT, bounce). Embedded hosts
//! never install a logger and the `log` macros compile to no-ops there.

/// Initialize the logger with default settings for terminal applications.
/// Uses INFO level by default; the RUST_LOG environment variable can override it.
/// Safe to call more than once; later calls are ignored.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init();
}
