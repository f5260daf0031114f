//! Logging setup for native binaries.

/// Initialize env_logger with default filter level `info`.
/// Override with the RUST_LOG environment variable.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}
