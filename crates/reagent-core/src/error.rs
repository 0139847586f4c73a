use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Reagent prototype '{0}' is defined more than once")]
    DuplicatePrototype(String),
}

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Payload is {found} bytes, expected {expected}")]
    Length { expected: usize, found: usize },

    #[error("Payload tagged for channel {found}, expected {expected}")]
    WrongChannel { expected: u32, found: u32 },

    #[error("Unknown injector mode byte {0}")]
    UnknownMode(u8),
}
