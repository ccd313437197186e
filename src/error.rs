/// Error returned by SDK operations.
///
/// Every failure is raised at the point of detection and propagates to the
/// immediate caller. There is no retry and no partial success: a failed
/// network call or a node-rejected transaction surfaces as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown symbol {0} and no decimals override provided")]
    UnknownSymbol(String),

    #[error("malformed balance response: {0}")]
    MalformedBalance(String),

    #[error("{0} does not exist")]
    EntityNotFound(String),

    #[error("{entity} row is missing the {field} field")]
    MissingField { entity: String, field: String },

    #[error("{entity} row has unexpected fields: {fields}")]
    UnexpectedFields { entity: String, fields: String },

    #[error("table scan protocol violation: {0}")]
    ProtocolViolation(String),

    /// Rejection reported by the remote node, passed through uninterpreted.
    #[error("node rejected the request: {0}")]
    Remote(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid node URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("cannot decode {entity} row: {source}")]
    RowParse {
        entity: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
