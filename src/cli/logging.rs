use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber.
///
/// `-v` enables debug events, otherwise `RUST_LOG` is honored with a warn default.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("glotx=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(colored::control::SHOULD_COLORIZE.should_colorize())
        .without_time()
        .compact();

    // a subscriber may already be installed when driven as a library
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
