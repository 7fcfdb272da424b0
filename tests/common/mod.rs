// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp directory environments, value grid builders and sample templates

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use envgrid::csv::{write_row, ReaderOptions};

/// Template exercising substitution, escapes, whitespace and malformed markers
pub const SAMPLE_TEMPLATE: &str = "key1 key2 qualified.key3
${key1} ${key2} ${qualified.key3}
${key1}${key2}${qualified.key3}
${key1 } ${key2 } ${qualified.key3 }
${ key1} ${ key2} ${ qualified.key3}
$${key1} $${key2} $${qualified.key3}

${key1{} ${key2{} ${qualified.key3{}
$${key1{} $${key2{} $${qualified.key3{}

${-key1} ${-key2} ${-qualified.key3}
$${-key1} $${-key2} $${-qualified.key3}
";

/// Value grid matching [`SAMPLE_TEMPLATE`]
pub const SAMPLE_GRID: &str = ",dev,uat,\"prod\"
\"key1\",dev-key1,uat-key1,prod-key1
key2,\"dev-key2\",uat-key2,prod-key2
qualified.key3,\"dev-qualified.key3\",uat-qualified.key3,prod-qualified.key3
";

/// What [`SAMPLE_TEMPLATE`] should render to for `environment`.
///
/// Escaped markers are parked under a sentinel so that only live markers
/// are substituted, then restored as plain `${`.
pub fn expected_sample_output(environment: &str) -> String {
    const SENTINEL: &str = "\u{1}ESCAPED\u{1}";
    let mut text = SAMPLE_TEMPLATE.replace("$${", SENTINEL);
    for key in ["key1", "key2", "qualified.key3"] {
        text = text.replace(&format!("${{{}}}", key), &format!("{}-{}", environment, key));
    }
    text.replace(SENTINEL, "${")
}

/// Replace the placeholder quote `'` and delimiter `,` in a test line
pub fn substitute(line: &str, quote: char, delimiter: char) -> String {
    line.replace('\'', &quote.to_string())
        .replace(',', &delimiter.to_string())
}

/// Builds a value grid row by row, quoting cells only where needed.
pub struct TestGridBuilder {
    options: ReaderOptions,
    environments: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
    line_ending: &'static str,
}

impl TestGridBuilder {
    pub fn new(environments: &[&str]) -> Self {
        Self {
            options: ReaderOptions::default(),
            environments: environments.iter().map(|e| e.to_string()).collect(),
            rows: Vec::new(),
            line_ending: "\n",
        }
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_line_ending(mut self, line_ending: &'static str) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_row(mut self, key: &str, values: &[&str]) -> Self {
        self.rows.push((
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn build(&self) -> String {
        let mut lines = Vec::new();

        let header = std::iter::once(String::new()).chain(self.environments.iter().cloned());
        lines.push(write_row(header, &self.options));

        for (key, values) in &self.rows {
            let row = std::iter::once(key.clone()).chain(values.iter().cloned());
            lines.push(write_row(row, &self.options));
        }

        let mut grid = lines.join(self.line_ending);
        grid.push_str(self.line_ending);
        grid
    }
}

pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    pub async fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .expect("Failed to create parent directory");
        }
        fs::write(&path, content)
            .await
            .expect("Failed to write test file");
        path
    }

    /// Write the grid to `ConfigValues.csv`, the default grid location
    pub async fn write_grid(&self, content: &str) -> PathBuf {
        self.write_file("ConfigValues.csv", content).await
    }

    pub async fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.file(relative))
            .await
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.file(relative).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_builder_quotes_where_needed() {
        let grid = TestGridBuilder::new(&["dev", "prod"])
            .with_row("url", &["http://a,b", "plain"])
            .build();
        assert_eq!(grid, ",dev,prod\nurl,\"http://a,b\",plain\n");
    }

    #[test]
    fn test_expected_sample_output() {
        let expected = expected_sample_output("dev");
        assert!(expected.contains("dev-key1 dev-key2 dev-qualified.key3\n"));
        assert!(expected.contains("${key1} ${key2} ${qualified.key3}\n"));
        assert!(expected.contains("${-key1}"));
    }

    #[tokio::test]
    async fn test_environment_setup() {
        let env = TestEnvironment::new();
        let path = env.write_file("nested/a.txt", "x").await;
        assert!(path.exists());
        assert_eq!(env.read_file("nested/a.txt").await, "x");
    }
}
