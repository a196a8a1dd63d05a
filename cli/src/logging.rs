use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise core and CLI events are shown at
/// `info`, or `debug` with `--verbose`. Stdout stays reserved for the
/// route itself.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "transit_route=debug,transit_route_core=debug"
    } else {
        "transit_route=info,transit_route_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init so a second call is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
