//! Store fixtures loaded from YAML at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::Store;

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<Store>,
}

/// Load and validate a seed file of stores.
///
/// Each entry uses the same field names as the JSON wire shape and goes
/// through the model's validation while parsing.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or lists the
/// same `store_id` twice.
pub fn load_stores(path: &Path) -> Result<Vec<Store>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: StoresFile = serde_yaml::from_str(&content)?;
    validate_stores(&file.stores)?;

    tracing::debug!(path = %path.display(), count = file.stores.len(), "loaded seed stores");
    Ok(file.stores)
}

fn validate_stores(stores: &[Store]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for store in stores {
        if !seen.insert(store.store_id()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store_id {} (store '{}')",
                store.store_id(),
                store.name()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TWO_STORES: &str = r#"
stores:
  - store_id: 2b0c6f44-5d7e-4a63-9f0e-3c1f4b1b8a01
    store_name: Union Square Greenmarket
    is_farmers_market: true
    location: { latitude: 40.7359, longitude: -73.9911 }
    address:
      address_line_1: E 17th St & Union Sq W
      city: New York
      state: NY
      county: New York
      zip_code: "10003"
  - store_id: 6d1e2a90-1b3c-4f5e-8a7b-9c0d1e2f3a4b
    store_name: Key Food
    store_code: KF-114
    location: { latitude: 40.6782, longitude: -73.9442 }
    address:
      address_line_1: 1000 Atlantic Ave
      address_line_2: Unit 2
      city: Brooklyn
      state: NY
      county: Kings
      zip_code: "11238"
      local_zip_code: "4401"
"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = write_temp(TWO_STORES);
        let stores = load_stores(file.path()).expect("load");
        assert_eq!(stores.len(), 2);
        assert!(stores[0].is_farmers_market());
        assert_eq!(stores[1].store_code(), Some("KF-114"));
        assert_eq!(stores[1].address().local_zip_code(), Some("4401"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_stores(Path::new("/definitely/not/here/stores.yaml"));
        assert!(matches!(result, Err(ConfigError::SeedFileIo { .. })), "{result:?}");
    }

    #[test]
    fn invalid_location_is_parse_error() {
        let yaml = TWO_STORES.replace("latitude: 40.7359", "latitude: 140.7359");
        let file = write_temp(&yaml);
        let result = load_stores(file.path());
        assert!(
            matches!(result, Err(ConfigError::SeedFileParse(_))),
            "{result:?}"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = TWO_STORES.replace(
            "6d1e2a90-1b3c-4f5e-8a7b-9c0d1e2f3a4b",
            "2b0c6f44-5d7e-4a63-9f0e-3c1f4b1b8a01",
        );
        let file = write_temp(&yaml);
        let result = load_stores(file.path());
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate store_id")),
            "{result:?}"
        );
    }

    #[test]
    fn load_stores_from_bundled_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join("config")
            .join("stores.yaml");
        let stores = load_stores(&path).expect("failed to load config/stores.yaml");
        assert!(!stores.is_empty());
    }
}
