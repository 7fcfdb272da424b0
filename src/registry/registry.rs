// ABOUTME: Builds per-environment value tables from a delimited value grid
// ABOUTME: Offers a strict loader with integrity checks and a lenient one without

use std::fs;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::environment::Environment;
use super::error::{RegistryError, Result};
use super::validation::{normalise_name, verify_environments, verify_keys};
use crate::csv::{CsvReader, ReaderOptions, TabularOptions, TabularReader};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Every environment read from one value grid, in header order.
///
/// Built once by [`RegistryLoader`] and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRegistry {
    environments: IndexMap<String, Environment>,
}

impl EnvironmentRegistry {
    /// Exact, case-sensitive lookup against the stored names
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.values()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    fn from_tables(tables: IndexMap<String, IndexMap<String, String>>) -> Self {
        let environments = tables
            .into_iter()
            .map(|(name, values)| (name.clone(), Environment::new(name, values)))
            .collect();
        Self { environments }
    }
}

/// Reads a value grid into an [`EnvironmentRegistry`].
///
/// The first row names the environments (its first cell is ignored), the
/// first column of each later row names a key.
///
/// In strict mode (the default) environment names and keys are trimmed and
/// lower-cased, every row must be as wide as the header, and names and keys
/// are checked for blanks, duplicates and invalid characters. Lenient mode
/// stores everything as written, skips the checks and keeps the first of any
/// duplicate.
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    reader_options: ReaderOptions,
    strict_mode: bool,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self {
            reader_options: ReaderOptions::default(),
            strict_mode: true,
        }
    }

    pub fn with_reader_options(mut self, options: ReaderOptions) -> Self {
        self.reader_options = options;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn load_str(&self, text: &str) -> Result<EnvironmentRegistry> {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        self.load_reader(text.as_bytes())
    }

    /// Load a grid file, ignoring a leading byte order mark
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<EnvironmentRegistry> {
        let path = path.as_ref();
        info!("Loading value grid from {}", path.display());
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }

    pub fn load_reader<R: Read>(&self, source: R) -> Result<EnvironmentRegistry> {
        let reader = CsvReader::new(source, self.reader_options.clone());
        let registry = if self.strict_mode {
            self.load_strict(reader)?
        } else {
            self.load_lenient(reader)?
        };

        debug!(
            environments = registry.len(),
            strict = self.strict_mode,
            "Built environment registry"
        );
        Ok(registry)
    }

    fn load_strict<R: Read>(&self, mut reader: CsvReader<R>) -> Result<EnvironmentRegistry> {
        if !reader.read_line()? {
            return Ok(EnvironmentRegistry::default());
        }

        let header = reader.values();
        let names: Vec<String> = header.iter().skip(1).cloned().collect();
        verify_environments(&names)?;

        let mut tables: IndexMap<String, IndexMap<String, String>> = names
            .iter()
            .map(|name| (normalise_name(name), IndexMap::new()))
            .collect();
        let expected = names.len() + 1;

        let mut keys = Vec::new();
        let mut line = 1;
        while reader.read_line()? {
            line += 1;
            let values = reader.values();
            let key = normalise_name(&values[0]);
            keys.push(key.clone());

            if values.len() != expected {
                return Err(RegistryError::FieldCountMismatch {
                    line,
                    actual: values.len(),
                    expected,
                });
            }

            for (table, value) in tables.values_mut().zip(&values[1..]) {
                table.entry(key.clone()).or_insert_with(|| value.clone());
            }
            debug!(line, key = %key, "Read grid row");
        }

        verify_keys(&keys)?;
        Ok(EnvironmentRegistry::from_tables(tables))
    }

    fn load_lenient<R: Read>(&self, reader: CsvReader<R>) -> Result<EnvironmentRegistry> {
        let mut grid = TabularReader::new(reader, TabularOptions::default().with_headers(true))?;

        let columns: Vec<(usize, String)> = (1..grid.column_count())
            .filter_map(|index| grid.column_name(index).map(|name| (index, name.to_string())))
            .collect();

        let mut tables: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for (_, name) in &columns {
            tables.entry(name.clone()).or_default();
        }

        while grid.read_line()? {
            let key = match grid.field_value(0) {
                Some(key) => key.to_string(),
                None => continue,
            };

            for (index, name) in &columns {
                let value = match grid.field_value(*index) {
                    Some(value) => value,
                    None => continue,
                };
                if let Some(table) = tables.get_mut(name) {
                    table.entry(key.clone()).or_insert_with(|| value.to_string());
                }
            }
        }

        Ok(EnvironmentRegistry::from_tables(tables))
    }
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = ",dev,uat,\"prod\"\n\
                        \"key1\",dev-key1,uat-key1,prod-key1\n\
                        key2,\"dev-key2\",uat-key2,prod-key2\n\
                        qualified.key3,\"dev-qualified.key3\",uat-qualified.key3,prod-qualified.key3\n";

    #[test]
    fn test_strict_load() {
        let registry = RegistryLoader::new().load_str(GRID).unwrap();
        assert_eq!(
            registry.environment_names().collect::<Vec<_>>(),
            vec!["dev", "uat", "prod"]
        );

        let dev = registry.get("dev").unwrap();
        assert_eq!(dev.get("key1"), Some("dev-key1"));
        assert_eq!(dev.get("qualified.key3"), Some("dev-qualified.key3"));
        assert_eq!(registry.get("prod").unwrap().transform("${key2}"), "prod-key2");
    }

    #[test]
    fn test_environment_lookup_is_case_sensitive() {
        let registry = RegistryLoader::new().load_str(GRID).unwrap();
        assert!(registry.get("DEV").is_none());
        assert!(registry.get("dev").is_some());
    }

    #[test]
    fn test_strict_normalises_names_and_keys() {
        let registry = RegistryLoader::new()
            .load_str(", Dev ,UAT\n  Key1 ,a,b\n")
            .unwrap();
        let dev = registry.get("dev").unwrap();
        assert_eq!(dev.get("key1"), Some("a"));
        assert_eq!(dev.transform("${Key1}"), "${Key1}");
        assert_eq!(registry.get("uat").unwrap().get("key1"), Some("b"));
    }

    #[test]
    fn test_empty_grid() {
        assert!(RegistryLoader::new().load_str("").unwrap().is_empty());
        assert!(RegistryLoader::new().with_strict_mode(false).load_str("").unwrap().is_empty());
    }

    #[test]
    fn test_field_count_mismatch_reports_line() {
        let err = RegistryLoader::new()
            .load_str(",dev,uat\nkey1,a,b\nkey2,a\n")
            .unwrap_err();
        match err {
            RegistryError::FieldCountMismatch {
                line,
                actual,
                expected,
            } => {
                assert_eq!((line, actual, expected), (3, 2, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_environment_checks_run_before_rows() {
        let err = RegistryLoader::new()
            .load_str(",dev,DEV\nkey1,a\n")
            .unwrap_err();
        match err {
            RegistryError::DuplicateEnvironment { environments } => {
                assert_eq!(environments, vec!["dev"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_key_errors() {
        let loader = RegistryLoader::new();
        assert!(matches!(
            loader.load_str(",dev\n ,a\n"),
            Err(RegistryError::BlankKey)
        ));
        assert!(matches!(
            loader.load_str(",dev\nkey,a\nKEY,b\n"),
            Err(RegistryError::DuplicateKey { keys }) if keys == vec!["key"]
        ));
        assert!(matches!(
            loader.load_str(",dev\nke}y,a\n"),
            Err(RegistryError::InvalidCharKey { keys }) if keys == vec!["ke}y"]
        ));
    }

    #[test]
    fn test_csv_errors_propagate() {
        let options = ReaderOptions::default().with_strict_quotes(true);
        let err = RegistryLoader::new()
            .with_reader_options(options)
            .load_str(",dev\nkey,\"open\n")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Csv(_)));
    }

    #[test]
    fn test_lenient_load_keeps_raw_names() {
        let registry = RegistryLoader::new()
            .with_strict_mode(false)
            .load_str(",Dev,dev\n Key ,a,b\nshort,c\nKey,x,y\n Key ,dup,dup\n")
            .unwrap();

        assert_eq!(
            registry.environment_names().collect::<Vec<_>>(),
            vec!["Dev", "dev"]
        );
        let upper = registry.get("Dev").unwrap();
        assert_eq!(upper.get(" Key "), Some("a"));
        assert_eq!(upper.get("Key"), Some("x"));
        assert_eq!(upper.get("short"), Some("c"));

        let lower = registry.get("dev").unwrap();
        assert_eq!(lower.get(" Key "), Some("b"));
        assert_eq!(lower.get("short"), None);
    }

    #[test]
    fn test_lenient_duplicate_columns_keep_first() {
        let registry = RegistryLoader::new()
            .with_strict_mode(false)
            .load_str(",dev,dev\nkey,first,second\n")
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dev").unwrap().get("key"), Some("first"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let registry = RegistryLoader::new()
            .load_str("\u{FEFF},dev\nkey,v\n")
            .unwrap();
        assert_eq!(registry.get("dev").unwrap().get("key"), Some("v"));
    }
}
