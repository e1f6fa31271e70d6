use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{Repository, Tables, WalletStore, find, upsert};
use crate::error::Result;
use crate::model::{Flower, JournalEntry};
use crate::wallet::Wallet;

/// Local JSON file holding
/// `{ "journal_entries": [...], "flowers": [...], "wallet": {...} }`.
/// The whole file is rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Tables::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Tables::default()
        };
        debug!(
            path = %path.display(),
            entries = tables.journal_entries.len(),
            flowers = tables.flowers.len(),
            "opened local store"
        );
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, tables: &Tables) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(tables)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Tables)) -> Result<()> {
        let mut t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = t.clone();
        f(&mut next);
        self.flush(&next)?;
        *t = next;
        Ok(())
    }
}

impl Repository for JsonFileStore {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(t.journal_entries.clone())
    }

    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        let t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(find(&t.journal_entries, id))
    }

    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        self.update(|t| upsert(&mut t.journal_entries, entry.clone()))?;
        Ok(entry)
    }

    fn flowers(&self) -> Result<Vec<Flower>> {
        let t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(t.flowers.clone())
    }

    fn flower(&self, id: &str) -> Result<Option<Flower>> {
        let t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(find(&t.flowers, id))
    }

    fn save_flower(&self, flower: Flower) -> Result<Flower> {
        self.update(|t| upsert(&mut t.flowers, flower.clone()))?;
        Ok(flower)
    }
}

impl WalletStore for JsonFileStore {
    fn load_wallet(&self) -> Result<Wallet> {
        let t = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(t.wallet.clone())
    }

    fn save_wallet(&self, wallet: &Wallet) -> Result<()> {
        self.update(|t| t.wallet = wallet.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Answer;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.flowers().unwrap().is_empty());
        store
            .save_flower(Flower {
                id: "f1".into(),
                journal_id: "j1".into(),
                answers: vec![Answer::C, Answer::D],
                position: [2.0, 0.0, -3.0],
                ..Default::default()
            })
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        let f = reopened.flower("f1").unwrap().unwrap();
        assert_eq!(f.answers, vec![Answer::C, Answer::D]);
        assert_eq!(f.position, [2.0, 0.0, -3.0]);
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/garden.json");
        let store = JsonFileStore::open(&path).unwrap();
        store
            .save_journal_entry(JournalEntry {
                id: "j1".into(),
                date: "2024-01-01".into(),
                title: "New year".into(),
                content: "Quiet.".into(),
                created_at: "2024-01-01T00:00:00Z".into(),
            })
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn wallet_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load_wallet().unwrap(), Wallet::new());
        let mut wallet = Wallet::new();
        wallet.collect("coin-7");
        store.save_wallet(&wallet).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.load_wallet().unwrap();
        assert_eq!(loaded.coins, 1);
        assert!(loaded.collected.contains("coin-7"));
    }

    #[test]
    fn files_without_a_wallet_still_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");
        fs::write(&path, r#"{"journal_entries": [], "flowers": []}"#).unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load_wallet().unwrap(), Wallet::new());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
