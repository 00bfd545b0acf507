use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("invalid template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("pattern has no group {0}")]
    UnknownGroup(String),

    /// Only reachable for patterns that need the backtracking engine
    /// (backreferences, look-around) when the backtrack limit is hit.
    #[error("matching aborted: {0}")]
    Backtrack(#[source] Box<fancy_regex::Error>),
}

impl Error {
    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
