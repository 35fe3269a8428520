use thiserror::Error;

/// Failures the assistant can surface to the shell.
///
/// An empty ranking is not represented here: it is a normal result that
/// switches the context assembler to its structural fallback.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Required external state is missing (e.g. the crawled page folder).
    #[error("{0}")]
    Configuration(String),

    /// The model service could not be reached or rejected the request.
    #[error("model service unavailable: {0}")]
    ModelUnavailable(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::ModelUnavailable(err.to_string())
    }
}
