use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET_FILTER: &str = "study_progress=info";
// module transitions and id repair log at debug
const VERBOSE_FILTER: &str = "study_progress=debug,info";

/// Logging for the dashboard binary. `RUST_LOG` overrides the default filter.
///
/// Events go to stderr so they never interleave with the menu on stdout.
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
