use std::fmt;

/// Stage of a dispatch round trip that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    /// Serializing the run request to JSON.
    Encode,
    /// Building the HTTP request (bad node address, etc.).
    Build,
    /// Sending the request or waiting for the response.
    Send,
    /// The runner answered with a non-2xx status.
    Status,
    /// The response body was not a valid run response.
    Decode,
    /// The caller cancelled or the dispatch deadline elapsed.
    Cancelled,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Encode => "marshal request",
            Self::Build => "build request",
            Self::Send => "request failed",
            Self::Status => "unexpected status",
            Self::Decode => "decode response",
            Self::Cancelled => "dispatch cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{stage}: {message}")]
    Dispatch {
        stage: DispatchStage,
        message: String,
    },

    #[error("Process error: {0}")]
    Process(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn dispatch(stage: DispatchStage, message: impl fmt::Display) -> Self {
        Self::Dispatch {
            stage,
            message: message.to_string(),
        }
    }
}
