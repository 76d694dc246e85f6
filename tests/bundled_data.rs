// Shipped catalog and config stay loadable and priced as expected

use parts_pricing::{CatalogStore, PricingConfig, MultiplierTable};
use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn test_bundled_config_matches_standard_table() {
    let config = PricingConfig::from_file(data_path("pricing.json")).unwrap();
    assert_eq!(config.pricing, MultiplierTable::standard());
    assert_eq!(config.reveal.threshold, 5);
}

#[test]
fn test_bundled_catalog_quotes() {
    let catalog = CatalogStore::from_file(data_path("pecas.json")).unwrap();
    let engine = PricingConfig::default().engine();

    assert_eq!(catalog.len(), 9);

    // 1250 * 1.35 * 1.6 = 2700
    let compressor = engine.quote("COMPRESSOR-9K", catalog.get("COMPRESSOR-9K"));
    assert_eq!(compressor.breakdown.base_price, 1250.0);
    assert_eq!(compressor.breakdown.final_value, 2700.0);
    assert_eq!(compressor.breakdown.discounted_value, Some(2430.0));

    // unrecognized category, clamped to the floor
    let bracket = engine.quote("SUPORTE-PAREDE", catalog.get("SUPORTE-PAREDE"));
    assert_eq!(bracket.breakdown.category_factor, 1.0);
    assert_eq!(bracket.breakdown.final_value, 250.0);
    assert!(bracket.breakdown.floor_applied);

    let no_price = engine.quote("SEM-PRECO-01", catalog.get("SEM-PRECO-01"));
    assert!(no_price.found);
    assert!(no_price.breakdown.is_zero());
}

#[test]
fn test_bundled_catalog_search() {
    let catalog = CatalogStore::from_file(data_path("pecas.json")).unwrap();

    assert_eq!(catalog.search("lc420"), vec!["LC420DUE-FHM1"]);
    // file order, not alphabetical
    assert_eq!(catalog.search("-0"), vec!["BN44-00806A", "MOTOR-GIRO-01", "SEM-PRECO-01"]);
    assert_eq!(catalog.search("o"), vec![
        "MOTOR-GIRO-01",
        "COMPRESSOR-9K",
        "CABO-FLAT-30P",
        "SUPORTE-PAREDE",
        "SEM-PRECO-01",
    ]);
}
