use crate::provider::error::DispatchError;

use super::types::*;

/// A single "invalidate this user's token" instruction for one resource
/// server. Only constructible through [`RevocationRequest::new`], so a held
/// value always has a non-blank host and user id and a non-zero port.
#[derive(Debug, Clone)]
pub struct RevocationRequest {
    host: ResourceServerHost,
    port: u16,
    user_id: UserId,
    admin_token: AdminToken,
}

impl RevocationRequest {
    pub fn new(
        host: ResourceServerHost,
        user_id: UserId,
        admin_token: AdminToken,
    ) -> Result<Self, DispatchError> {
        if host.0.trim().is_empty() {
            return Err(DispatchError::InvalidRequest("empty resource server host".into()));
        }
        if user_id.0.trim().is_empty() {
            return Err(DispatchError::InvalidRequest("empty user id".into()));
        }
        Ok(Self {
            host,
            port: DEFAULT_HTTPS_PORT,
            user_id,
            admin_token,
        })
    }

    pub fn with_port(mut self, port: u16) -> Result<Self, DispatchError> {
        if port == 0 {
            return Err(DispatchError::InvalidRequest("port 0 is not a valid TCP port".into()));
        }
        self.port = port;
        Ok(self)
    }

    pub fn host(&self) -> &ResourceServerHost {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn admin_token(&self) -> &AdminToken {
        &self.admin_token
    }
}

/// Normalised result of one revocation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationOutcome {
    failure: Option<String>,
}

impl RevocationOutcome {
    pub fn success() -> Self {
        Self { failure: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl From<Result<(), DispatchError>> for RevocationOutcome {
    fn from(result: Result<(), DispatchError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
