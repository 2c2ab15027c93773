//! Helpers shared by the dnswire test suites.

use std::sync::Once;

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
///
/// Filtering follows `RUST_LOG`, e.g. `RUST_LOG=dnswire=trace cargo test`.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("a global subscriber was already installed");
    });
}

