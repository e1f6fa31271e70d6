use thiserror::Error;

pub type Result<T> = std::result::Result<T, GardenError>;

#[derive(Error, Debug)]
pub enum GardenError {
    /// A journal entry is missing one of its required fields
    #[error("Invalid journal entry format: missing {field}")]
    InvalidJournalEntry { field: &'static str },

    /// A flower is missing one of its required fields
    #[error("Invalid flower format: missing {field}")]
    InvalidFlower { field: &'static str },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Planting needs the journal entry the flower grows from
    #[error("No journal entry found with id {0}; create a journal entry first")]
    JournalMissing(String),

    #[error("Not enough coins: have {have}, need {need}")]
    InsufficientCoins { have: u32, need: u32 },

    #[error("Answer must be one of A, B, C, D; got {0:?}")]
    InvalidAnswer(char),

    /// A placement or workload parameter outside its accepted range
    #[error("Invalid {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for GardenError {
    fn from(err: reqwest::Error) -> Self {
        GardenError::Remote(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GardenError {
    fn from(err: tokio::task::JoinError) -> Self {
        GardenError::Task(err.to_string())
    }
}

impl GardenError {
    pub fn journal_not_found(id: &str) -> Self {
        GardenError::NotFound {
            kind: "Journal entry",
            id: id.to_string(),
        }
    }

    pub fn flower_not_found(id: &str) -> Self {
        GardenError::NotFound {
            kind: "Flower",
            id: id.to_string(),
        }
    }

    /// Validation failures the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GardenError::InvalidJournalEntry { .. }
                | GardenError::InvalidFlower { .. }
                | GardenError::JournalMissing(_)
                | GardenError::InvalidAnswer(_)
                | GardenError::InvalidParameter { .. }
        )
    }
}
