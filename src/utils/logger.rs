use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "countries_etl=info";
const VERBOSE_DIRECTIVE: &str = "countries_etl=debug,info";

/// `RUST_LOG` wins over the built-in directives when it is set.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_cli_logger(verbose: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("logger already initialised: {}", e);
    }
}

pub fn init_lambda_logger() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .json() // CloudWatch indexes JSON lines
        .with_current_span(false);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(false))
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("logger already initialised: {}", e);
    }
}
