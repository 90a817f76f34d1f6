use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,covershelf_core=info,reqwest=warn";

/// Installs the global subscriber: `RUST_LOG` (or [`DEFAULT_FILTER`]) plus
/// a fmt layer on stderr.
///
/// Returns `false` when a subscriber was already installed, which keeps
/// repeated calls from tests and embedders harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
