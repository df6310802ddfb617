pub mod logging;

/// Initializes env_logger for embedders that have no logger of their own.
/// Reads `RUST_LOG`, defaulting to info.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
