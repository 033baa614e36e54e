use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Headlines already turned into episodes. Persisted as a JSON array of
/// strings; append-only across runs, no expiry.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    titles: HashSet<String>,
}

impl ProcessedSet {
    /// Load the set from disk. A missing file is an empty set, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let titles: Vec<String> = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse {}. The file may be corrupted; expected a JSON array of titles.",
                path.display()
            )
        })?;

        Ok(Self {
            titles: titles.into_iter().collect(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut titles: Vec<&str> = self.titles.iter().map(|s| s.as_str()).collect();
        titles.sort_unstable();

        let json =
            serde_json::to_string_pretty(&titles).context("Failed to serialize processed set")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn insert(&mut self, title: String) {
        self.titles.insert(title);
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
