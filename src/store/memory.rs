use std::sync::{PoisonError, RwLock};

use super::{Repository, Tables, WalletStore, find, upsert};
use crate::error::Result;
use crate::model::{Flower, JournalEntry};
use crate::wallet::Wallet;

/// In-memory store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Repository for MemStore {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let t = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(t.journal_entries.clone())
    }

    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        let t = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(find(&t.journal_entries, id))
    }

    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        let mut t = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        upsert(&mut t.journal_entries, entry.clone());
        Ok(entry)
    }

    fn flowers(&self) -> Result<Vec<Flower>> {
        let t = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(t.flowers.clone())
    }

    fn flower(&self, id: &str) -> Result<Option<Flower>> {
        let t = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(find(&t.flowers, id))
    }

    fn save_flower(&self, flower: Flower) -> Result<Flower> {
        let mut t = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        upsert(&mut t.flowers, flower.clone());
        Ok(flower)
    }
}

impl WalletStore for MemStore {
    fn load_wallet(&self) -> Result<Wallet> {
        let t = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(t.wallet.clone())
    }

    fn save_wallet(&self, wallet: &Wallet) -> Result<()> {
        let mut t = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        t.wallet = wallet.clone();
        Ok(())
    }
}
