use crate::auth::envelope::{ResponseBuilder, ResultEnvelope};

/// Everything that can go wrong between accepting a revocation and hearing
/// back from the resource server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// DNS, connect, TLS or timeout failure before any response arrived.
    #[error("{0}")]
    Transport(String),
    /// A response arrived but its status or content type was wrong.
    #[error("{0}")]
    Protocol(String),
    /// A well-formed response without the success sentinel.
    #[error("{0}")]
    Semantic(String),
    #[error("invalid revocation request: {0}")]
    InvalidRequest(String),
    /// The dispatcher itself was set up with unusable settings.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::Semantic(_) => "semantic",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "config",
        }
    }

    /// HTTP-like classification used when reporting upstream.
    pub fn type_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::Config(_) => 500,
            _ => 502,
        }
    }

    pub fn to_envelope(&self) -> ResultEnvelope {
        ResponseBuilder::failed()
            .with_type_code(self.type_code())
            .with_detail(self.to_string())
            .build()
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<url::ParseError> for DispatchError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidRequest(format!("bad resource server address: {}", e))
    }
}
