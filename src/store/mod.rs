//! Journal and flower persistence behind one `Repository` trait, plus the
//! wallet behind `WalletStore`.
//!
//! Backends:
//! - `MemStore`: process memory, what the HTTP server keeps
//! - `JsonFileStore`: a local JSON file, the offline copy
//! - `RemoteStore`: the HTTP API of a running server
//! - `Fallback`: primary first, secondary on failure

pub mod fallback;
pub mod file;
pub mod memory;
pub mod remote;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Flower, JournalEntry};
use crate::placement::Point2;
use crate::wallet::Wallet;

pub use fallback::Fallback;
pub use file::JsonFileStore;
pub use memory::MemStore;
pub use remote::RemoteStore;

pub trait Repository: Send + Sync {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>>;
    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>>;
    /// Insert, or replace the entry with the same id in place.
    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry>;

    fn flowers(&self) -> Result<Vec<Flower>>;
    fn flower(&self, id: &str) -> Result<Option<Flower>>;
    /// Insert, or replace the flower with the same id in place.
    fn save_flower(&self, flower: Flower) -> Result<Flower>;

    /// Occupied ground positions, read before each placement.
    fn flower_positions(&self) -> Result<Vec<Point2>> {
        Ok(self
            .flowers()?
            .iter()
            .map(Flower::ground_position)
            .collect())
    }

    fn flower_by_journal(&self, journal_id: &str) -> Result<Option<Flower>> {
        Ok(self
            .flowers()?
            .into_iter()
            .find(|f| f.journal_id == journal_id))
    }
}

/// Load/save of the single coin wallet.
pub trait WalletStore: Send + Sync {
    /// The saved wallet, or a fresh one when nothing was saved yet.
    fn load_wallet(&self) -> Result<Wallet>;
    fn save_wallet(&self, wallet: &Wallet) -> Result<()>;
}

/// Everything the HTTP server persists.
pub trait Store: Repository + WalletStore {}

impl<T: Repository + WalletStore> Store for T {}

impl<T: Repository + ?Sized> Repository for Box<T> {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        (**self).journal_entries()
    }

    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        (**self).journal_entry(id)
    }

    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        (**self).save_journal_entry(entry)
    }

    fn flowers(&self) -> Result<Vec<Flower>> {
        (**self).flowers()
    }

    fn flower(&self, id: &str) -> Result<Option<Flower>> {
        (**self).flower(id)
    }

    fn save_flower(&self, flower: Flower) -> Result<Flower> {
        (**self).save_flower(flower)
    }
}

impl<T: WalletStore + ?Sized> WalletStore for Box<T> {
    fn load_wallet(&self) -> Result<Wallet> {
        (**self).load_wallet()
    }

    fn save_wallet(&self, wallet: &Wallet) -> Result<()> {
        (**self).save_wallet(wallet)
    }
}

/// Records keyed by string id, kept in insertion order.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for JournalEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Flower {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn upsert<T: Keyed>(rows: &mut Vec<T>, row: T) {
    match rows.iter_mut().find(|r| r.key() == row.key()) {
        Some(slot) => *slot = row,
        None => rows.push(row),
    }
}

pub(crate) fn find<T: Keyed + Clone>(rows: &[T], id: &str) -> Option<T> {
    rows.iter().find(|r| r.key() == id).cloned()
}

/// Everything one store holds. Also the on-disk layout of `JsonFileStore`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub journal_entries: Vec<JournalEntry>,
    pub flowers: Vec<Flower>,
    pub wallet: Wallet,
}
