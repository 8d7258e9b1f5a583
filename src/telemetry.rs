use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter,
};

/// Logs go to stderr; stdout belongs to the card view.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}
