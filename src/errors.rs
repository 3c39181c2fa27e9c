use thiserror::Error;

/// Input problems caught before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Account name must not be empty")]
    EmptyAccountName,
    #[error("Must provide at least one amount")]
    NoPositiveAmounts,
    #[error("Amount for {account} exceeds the maximum of {max}")]
    AmountTooLarge { account: String, max: u64 },
}

/// Error type that captures tracker failures across domain, storage and CLI layers.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No record on {0}")]
    RecordNotFound(chrono::NaiveDate),
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TrackerError {
    /// True for failures the user can fix by changing their input.
    pub fn is_recoverable_input(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_)
                | TrackerError::RecordNotFound(_)
                | TrackerError::MalformedDocument(_)
                | TrackerError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
