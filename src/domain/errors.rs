#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => {
                write!(f, "Storage I/O error: {}", err)
            }
            StorageError::Serialization(err) => {
                write!(f, "Storage format error: {}", err)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure below the API envelope: the request never produced a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    Request(String),
    Decode(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Request(msg) => {
                write!(f, "Request failed: {}", msg)
            }
            TransportError::Decode(msg) => {
                write!(f, "Malformed response: {}", msg)
            }
        }
    }
}

impl std::error::Error for TransportError {}

pub type TransportResult<T> = Result<T, TransportError>;
