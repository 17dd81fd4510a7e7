use std::io::Write;

use super::*;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

#[test]
fn normalized_address_folds_case_and_accents() {
    let address = Address::new("Málaga", "Vélez-Málaga", "Avenida de Andalucía", 12);
    let normalized = address.normalized();
    assert_eq!(normalized.province, "malaga");
    assert_eq!(normalized.city, "VELEZ-MALAGA");
    assert_eq!(normalized.street_name, "AVENIDA DE ANDALUCIA");
    assert_eq!(normalized.street_number, 12);
}

#[test]
fn load_addresses_parses_entries() {
    let file = write_yaml(
        "addresses:\n  - province: Madrid\n    city: Madrid\n    street_name: Gran Vía\n    street_number: 1\n  - province: Sevilla\n    city: Sevilla\n    street_name: Calle Sierpes\n    street_number: 20\n    order_types: [delivery]\n",
    );
    let loaded = load_addresses(file.path()).unwrap();
    assert_eq!(loaded.addresses.len(), 2);
    assert_eq!(loaded.addresses[0].address.street_name, "Gran Vía");
    assert!(loaded.addresses[0].wants(OrderType::PickUp));
    assert!(!loaded.addresses[1].wants(OrderType::PickUp));
    assert!(loaded.addresses[1].wants(OrderType::Delivery));
}

#[test]
fn load_addresses_rejects_zero_street_number() {
    let file = write_yaml(
        "addresses:\n  - province: Madrid\n    city: Madrid\n    street_name: Gran Via\n    street_number: 0\n",
    );
    let result = load_addresses(file.path());
    assert!(matches!(result, Err(ConfigError::Validation(_))), "got: {result:?}");
}

#[test]
fn load_addresses_rejects_duplicates_after_normalization() {
    let file = write_yaml(
        "addresses:\n  - province: Madrid\n    city: Madrid\n    street_name: Gran Vía\n    street_number: 1\n  - province: madrid\n    city: MADRID\n    street_name: gran via\n    street_number: 1\n",
    );
    let result = load_addresses(file.path());
    assert!(matches!(result, Err(ConfigError::Validation(ref m)) if m.contains("duplicate")));
}

#[test]
fn load_addresses_rejects_empty_order_types() {
    let file = write_yaml(
        "addresses:\n  - province: Madrid\n    city: Madrid\n    street_name: Gran Via\n    street_number: 3\n    order_types: []\n",
    );
    assert!(matches!(
        load_addresses(file.path()),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn load_addresses_reports_missing_file() {
    let result = load_addresses(Path::new("/nonexistent/addresses.yaml"));
    assert!(matches!(result, Err(ConfigError::FileIo { .. })));
}

#[test]
fn load_addresses_reports_bad_yaml() {
    let file = write_yaml("addresses: [this is: not valid");
    assert!(matches!(
        load_addresses(file.path()),
        Err(ConfigError::YamlParse { .. })
    ));
}
