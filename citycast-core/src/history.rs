//! Recent searches and the last searched city, kept in durable key-value storage.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

pub const RECENT_CITIES_KEY: &str = "recent_cities";
pub const LAST_CITY_KEY: &str = "last_city";
pub const MAX_RECENT: usize = 5;

/// String-valued persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store, and so is
    /// one that does not hold a JSON object of strings; the latter is
    /// overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self { path, entries: BTreeMap::new() });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;

        let entries = serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "Ignoring unreadable history file: {e}");
            BTreeMap::new()
        });

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Capitalize each word: "new YORK" -> "New York", "aix-en-provence" -> "Aix-En-Provence".
pub fn normalize_city(city: &str) -> String {
    let mut out = String::with_capacity(city.len());
    let mut at_word_start = true;

    for ch in city.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Most-recent-first list of up to [`MAX_RECENT`] cities plus the last-city slot.
#[derive(Debug)]
pub struct RecentSearches<S> {
    store: S,
    cities: Vec<String>,
}

impl<S: KeyValueStore> RecentSearches<S> {
    /// Read the persisted list; absent or unreadable data starts empty.
    pub fn load(store: S) -> Self {
        let cities = match store.get(RECENT_CITIES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(stored) => {
                    let mut cities: Vec<String> = Vec::with_capacity(MAX_RECENT);
                    for city in stored.iter().map(|c| normalize_city(c)) {
                        if !city.is_empty() && !cities.contains(&city) {
                            cities.push(city);
                        }
                    }
                    cities.truncate(MAX_RECENT);
                    cities
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable recent cities: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read recent cities: {e:#}");
                Vec::new()
            }
        };

        Self { store, cities }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn last_city(&self) -> Option<String> {
        match self.store.get(LAST_CITY_KEY) {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read last city: {e:#}");
                None
            }
        }
    }

    /// Move `city` to the front and persist the list and last-city slot.
    pub fn record(&mut self, city: &str) -> Result<()> {
        let city = normalize_city(city);

        self.cities.retain(|c| c != &city);
        self.cities.insert(0, city.clone());
        self.cities.truncate(MAX_RECENT);

        let json = serde_json::to_string(&self.cities).context("Failed to encode recent cities")?;
        self.store.set(RECENT_CITIES_KEY, &json)?;
        self.store.set(LAST_CITY_KEY, &city)?;

        Ok(())
    }

    /// Forget every recent city and the last city.
    pub fn clear(&mut self) -> Result<()> {
        self.cities.clear();
        self.store.remove(RECENT_CITIES_KEY)?;
        self.store.remove(LAST_CITY_KEY)?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
