/// Initializes env_logger. Bootstrap notifications are logged at `info`, so they are
/// visible by default; `verbose` adds the `debug` details.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_target(false)
        .init();
}
