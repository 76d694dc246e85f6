// 📦 Catalog Store - static code → part table
// Loaded once at startup from JSON (pecas.json shape) or CSV; read-only afterwards

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// CatalogRecord - one part as supplied by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub code: String,
    pub category: String, // TIPO
    pub raw_value: String, // VALOR, e.g. "R$ 123,45"
}

impl CatalogRecord {
    pub fn new(code: &str, category: &str, raw_value: &str) -> Self {
        CatalogRecord {
            code: code.to_string(),
            category: category.to_string(),
            raw_value: raw_value.to_string(),
        }
    }
}

/// Entry shape inside pecas.json
#[derive(Debug, Deserialize)]
struct JsonEntry {
    #[serde(rename = "TIPO", default)]
    tipo: String,

    #[serde(rename = "VALOR", default)]
    valor: String,
}

/// Row shape for CSV catalogs: code,category,value
#[derive(Debug, Deserialize)]
struct CsvRow {
    code: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    value: String,
}

/// CatalogFormat - which loader handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Csv,
}

impl CatalogFormat {
    pub fn name(&self) -> &str {
        match self {
            CatalogFormat::Json => "JSON",
            CatalogFormat::Csv => "CSV",
        }
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// CatalogLoader - turns a file into records
pub trait CatalogLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<CatalogRecord>>;

    fn format(&self) -> CatalogFormat;
}

/// Detect catalog format from the file extension
pub fn detect_format(path: &Path) -> Result<CatalogFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => Ok(CatalogFormat::Json),
        "csv" => Ok(CatalogFormat::Csv),
        _ => Err(anyhow::anyhow!(
            "Could not detect catalog format from filename: {}",
            path.display()
        )),
    }
}

/// Factory: loader for a format
pub fn get_loader(format: CatalogFormat) -> Box<dyn CatalogLoader> {
    match format {
        CatalogFormat::Json => Box::new(JsonCatalogLoader),
        CatalogFormat::Csv => Box::new(CsvCatalogLoader),
    }
}

/// `{ "<code>": { "TIPO": "...", "VALOR": "R$ ..." } }`
pub struct JsonCatalogLoader;

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self, path: &Path) -> Result<Vec<CatalogRecord>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        // serde_json is built with preserve_order: keys come back in file order
        let entries: serde_json::Map<String, serde_json::Value> =
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;

        let mut records = Vec::with_capacity(entries.len());
        for (code, value) in entries {
            let entry: JsonEntry = serde_json::from_value(value).with_context(|| {
                format!("Failed to parse entry {:?} in {}", code, path.display())
            })?;

            records.push(CatalogRecord {
                code,
                category: entry.tipo,
                raw_value: entry.valor,
            });
        }

        Ok(records)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Json
    }
}

/// Header row `code,category,value`
pub struct CsvCatalogLoader;

impl CatalogLoader for CsvCatalogLoader {
    fn load(&self, path: &Path) -> Result<Vec<CatalogRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let mut records = Vec::new();
        for (line_num, result) in reader.deserialize().enumerate() {
            let row: CsvRow = result.with_context(|| {
                format!("Failed to parse CSV line {} in {}", line_num + 2, path.display())
            })?;

            records.push(CatalogRecord {
                code: row.code,
                category: row.category,
                raw_value: row.value,
            });
        }

        Ok(records)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Csv
    }
}

// ============================================================================
// STORE
// ============================================================================

/// CatalogStore - exact lookup plus substring search over codes
#[derive(Debug, Clone)]
pub struct CatalogStore {
    records: HashMap<String, CatalogRecord>,
    codes: Vec<String>, // catalog order
    loaded_at: DateTime<Utc>,
}

impl CatalogStore {
    /// Build a store in catalog order; a duplicate code keeps its first
    /// position but takes the last record
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut by_code = HashMap::with_capacity(records.len());
        let mut codes = Vec::with_capacity(records.len());

        for record in records {
            let code = record.code.clone();
            match by_code.insert(code.clone(), record) {
                Some(_) => {
                    tracing::warn!(code = %code, "duplicate catalog code, keeping last entry");
                }
                None => codes.push(code),
            }
        }

        CatalogStore {
            records: by_code,
            codes,
            loaded_at: Utc::now(),
        }
    }

    /// Load from a .json or .csv file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format(path)?;
        let records = get_loader(format)
            .load(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?;

        let store = CatalogStore::from_records(records);
        tracing::info!(
            path = %path.display(),
            format = format.name(),
            parts = store.len(),
            "catalog loaded"
        );

        Ok(store)
    }

    pub fn get(&self, code: &str) -> Option<&CatalogRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All codes, in catalog order
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Case-insensitive substring match on codes; empty term → no suggestions
    pub fn search(&self, term: &str) -> Vec<&str> {
        self.search_limited(term, usize::MAX)
    }

    pub fn search_limited(&self, term: &str, limit: usize) -> Vec<&str> {
        if term.is_empty() {
            return Vec::new();
        }

        let needle = term.to_lowercase();
        self.codes
            .iter()
            .filter(|code| code.to_lowercase().contains(&needle))
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    /// Distinct category labels present in the catalog, ascending
    pub fn categories(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.records.values().map(|r| r.category.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_store() -> CatalogStore {
        CatalogStore::from_records(vec![
            CatalogRecord::new("LC320DUE-SFR1", "OPEN CELL", "R$ 310,00"),
            CatalogRecord::new("BN44-00806A", "PLACA FONTE", "R$ 95,50"),
            CatalogRecord::new("lc420due", "DISPLAY MONTADO", "R$ 480,00"),
            CatalogRecord::new("EBR-7777", "COMPONENTE MECÂNICO", ""),
        ])
    }

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_exact_lookup() {
        let store = sample_store();

        assert_eq!(store.get("BN44-00806A").unwrap().category, "PLACA FONTE");
        assert!(store.get("bn44-00806a").is_none());
        assert!(store.get("").is_none());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let store = sample_store();

        let results = store.search("lc");
        assert_eq!(results, vec!["LC320DUE-SFR1", "lc420due"]);

        assert_eq!(store.search("DUE"), vec!["LC320DUE-SFR1", "lc420due"]);
        assert_eq!(store.search("a"), vec!["BN44-00806A"]);
        assert_eq!(store.search("E"), vec!["LC320DUE-SFR1", "lc420due", "EBR-7777"]);
        assert_eq!(store.search("806"), vec!["BN44-00806A"]);
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_search_empty_term() {
        assert!(sample_store().search("").is_empty());
    }

    #[test]
    fn test_search_limited() {
        let store = sample_store();
        assert_eq!(store.search_limited("e", 2).len(), 2);
    }

    #[test]
    fn test_search_keeps_catalog_order() {
        let store = CatalogStore::from_records(vec![
            CatalogRecord::new("ZZ-1", "OUTROS", "R$ 1,00"),
            CatalogRecord::new("MM-2", "OUTROS", "R$ 1,00"),
            CatalogRecord::new("AA-1", "OUTROS", "R$ 1,00"),
        ]);

        assert_eq!(store.search("-1"), vec!["ZZ-1", "AA-1"]);
        assert_eq!(store.codes(), ["ZZ-1", "MM-2", "AA-1"]);
    }

    #[test]
    fn test_duplicate_code_last_wins() {
        let store = CatalogStore::from_records(vec![
            CatalogRecord::new("A1", "OUTROS", "R$ 1,00"),
            CatalogRecord::new("B2", "OUTROS", "R$ 5,00"),
            CatalogRecord::new("A1", "OUTROS", "R$ 2,00"),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("A1").unwrap().raw_value, "R$ 2,00");
        // first position is kept
        assert_eq!(store.codes(), ["A1", "B2"]);
    }

    #[test]
    fn test_categories() {
        let store = sample_store();
        assert_eq!(
            store.categories(),
            vec!["COMPONENTE MECÂNICO", "DISPLAY MONTADO", "OPEN CELL", "PLACA FONTE"]
        );
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("pecas.json")).unwrap(), CatalogFormat::Json);
        assert_eq!(detect_format(Path::new("data/PECAS.CSV")).unwrap(), CatalogFormat::Csv);
        assert!(detect_format(Path::new("pecas.xlsx")).is_err());
        assert!(detect_format(Path::new("pecas")).is_err());
    }

    #[test]
    fn test_load_json_catalog() {
        let path = temp_file(
            "parts_pricing_catalog_test.json",
            r#"{
                "T-CON 6870C": { "TIPO": "PLACA DE CIRCUITO IMPRESSO", "VALOR": "R$ 120,00" },
                "HV320WHB": { "TIPO": "OPEN CELL", "VALOR": "R$ 1.050,90" },
                "SEM-VALOR": { "TIPO": "OUTROS" }
            }"#,
        );

        let store = CatalogStore::from_file(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.codes(), ["T-CON 6870C", "HV320WHB", "SEM-VALOR"]);
        assert_eq!(store.get("HV320WHB").unwrap().raw_value, "R$ 1.050,90");
        assert_eq!(store.get("SEM-VALOR").unwrap().raw_value, "");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_json_keeps_file_order() {
        let path = temp_file(
            "parts_pricing_catalog_order.json",
            r#"{ "ZZ-1": { "TIPO": "OUTROS", "VALOR": "R$ 1,00" },
                 "AA-1": { "TIPO": "OUTROS", "VALOR": "R$ 2,00" } }"#,
        );

        let store = CatalogStore::from_file(&path).unwrap();
        assert_eq!(store.search("-1"), vec!["ZZ-1", "AA-1"]);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_csv_catalog() {
        let path = temp_file(
            "parts_pricing_catalog_test.csv",
            "code,category,value\nBN44-00806A,PLACA FONTE,\"R$ 95,50\"\nX-1,OUTROS,\n",
        );

        let store = CatalogStore::from_file(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("BN44-00806A").unwrap().raw_value, "R$ 95,50");
        assert_eq!(store.get("X-1").unwrap().raw_value, "");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_malformed_json() {
        let path = temp_file("parts_pricing_catalog_bad.json", "[1, 2, 3]");

        let err = CatalogStore::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse JSON"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_loader_factory() {
        assert_eq!(get_loader(CatalogFormat::Json).format(), CatalogFormat::Json);
        assert_eq!(get_loader(CatalogFormat::Csv).format(), CatalogFormat::Csv);
    }
}
