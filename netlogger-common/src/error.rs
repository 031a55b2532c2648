use thiserror::Error;

/// Failure while lifting raw XML fields into a typed record
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("net record has no Server field")]
    MissingServer,

    #[error("{field} value {value:?} does not match \"%Y-%m-%d %H:%M:%S\": {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
