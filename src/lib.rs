// Parts Pricing - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod catalog;
pub mod config;
pub mod currency;
pub mod pricing;
pub mod reveal;
pub mod rules;

#[cfg(feature = "server")]
pub mod server;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Re-export commonly used types
pub use catalog::{
    CatalogStore, CatalogRecord, CatalogFormat, CatalogLoader,
    detect_format, get_loader,
    JsonCatalogLoader, CsvCatalogLoader,
};
pub use config::PricingConfig;
pub use currency::{parse_currency, format_money, ParseMode};
pub use pricing::{
    PricingEngine, PriceBreakdown, PriceQuote,
    compute, compute_with_mode,
};
pub use reveal::{RevealController, RevealSettings};
pub use rules::{Category, MultiplierTable, UNRECOGNIZED_FACTOR};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing to stderr; `RUST_LOG` overrides the default level
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
