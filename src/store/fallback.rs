use tracing::warn;

use super::Repository;
use crate::error::Result;
use crate::model::{Flower, JournalEntry};

/// Remote-then-local repository.
///
/// Writes go to `primary` and are mirrored into `secondary`; when the
/// primary fails the write lands in `secondary` only. Reads prefer
/// `primary` and refresh `secondary` with what they got. Single-record
/// lookups the primary does not know about are answered from `secondary`,
/// so records written while offline stay reachable. No reconciliation of
/// local-only records back to the primary is attempted.
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Repository, S: Repository> Fallback<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    fn mirror<T>(&self, what: &str, rows: &[T], save: impl Fn(&S, T) -> Result<T>)
    where
        T: Clone,
    {
        for row in rows {
            if let Err(e) = save(&self.secondary, row.clone()) {
                warn!(error = %e, "failed to mirror {what} locally");
                return;
            }
        }
    }

    fn read<T>(
        &self,
        what: &str,
        from_primary: impl FnOnce(&P) -> Result<T>,
        from_secondary: impl FnOnce(&S) -> Result<T>,
    ) -> Result<T> {
        match from_primary(&self.primary) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, "failed to fetch {what} from server, using local store");
                from_secondary(&self.secondary)
            }
        }
    }

    fn read_one<T>(
        &self,
        what: &str,
        from_primary: impl FnOnce(&P) -> Result<Option<T>>,
        from_secondary: impl FnOnce(&S) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        match self.read(what, from_primary, |_| Ok(None)) {
            Ok(Some(v)) => Ok(Some(v)),
            Ok(None) => from_secondary(&self.secondary),
            Err(e) => Err(e),
        }
    }

    fn write<T: Clone>(
        &self,
        what: &str,
        row: T,
        save_primary: impl FnOnce(&P, T) -> Result<T>,
        save_secondary: impl Fn(&S, T) -> Result<T>,
    ) -> Result<T> {
        match save_primary(&self.primary, row.clone()) {
            Ok(saved) => {
                if let Err(e) = save_secondary(&self.secondary, saved.clone()) {
                    warn!(error = %e, "failed to back up {what} locally");
                }
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "failed to save {what} to server, saving locally");
                save_secondary(&self.secondary, row)
            }
        }
    }
}

impl<P: Repository, S: Repository> Repository for Fallback<P, S> {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let rows = self.read("journal entries", P::journal_entries, S::journal_entries)?;
        self.mirror("journal entries", &rows, S::save_journal_entry);
        Ok(rows)
    }

    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        self.read_one(
            "journal entry",
            |p| p.journal_entry(id),
            |s| s.journal_entry(id),
        )
    }

    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        self.write(
            "journal entry",
            entry,
            P::save_journal_entry,
            S::save_journal_entry,
        )
    }

    fn flowers(&self) -> Result<Vec<Flower>> {
        let rows = self.read("flowers", P::flowers, S::flowers)?;
        self.mirror("flowers", &rows, S::save_flower);
        Ok(rows)
    }

    fn flower(&self, id: &str) -> Result<Option<Flower>> {
        self.read_one("flower", |p| p.flower(id), |s| s.flower(id))
    }

    fn save_flower(&self, flower: Flower) -> Result<Flower> {
        self.write("flower", flower, P::save_flower, S::save_flower)
    }
}
