use crate::core::models::RevocationRequest;
use crate::core::types::{AdminToken, ResourceServerHost, UserId};
use crate::provider::error::DispatchError;

const SUCCESS_SUFFIX: &str = "success";

/// Body sent to a resource server's revocation endpoint.
#[derive(Debug, serde::Serialize)]
pub struct RsRevocationRequest<'a> {
    pub sub: &'a UserId,
}

/// The part of a resource server's reply we care about.
#[derive(Debug, Default, serde::Deserialize)]
pub struct RsRevocationResponse {
    #[serde(rename = "type")]
    #[serde(default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
}

impl RsRevocationResponse {
    /// The `type` URN, or `""` when absent or not a string.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        is_success_type(self.kind())
    }
}

/// Success sentinel: a non-blank URN ending in `success`, any case.
pub fn is_success_type(kind: &str) -> bool {
    if kind.trim().is_empty() {
        return false;
    }
    let kind = kind.as_bytes();
    let suffix = SUCCESS_SUFFIX.as_bytes();
    kind.len() >= suffix.len() && kind[kind.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Request accepted by the admin API.
#[derive(Debug, serde::Deserialize)]
pub struct RevocationApiRequest {
    pub rs_url: String,
    pub port: Option<u16>,
    pub user_id: String,
}

impl RevocationApiRequest {
    pub fn into_request(self, admin_token: AdminToken) -> Result<RevocationRequest, DispatchError> {
        let request = RevocationRequest::new(
            ResourceServerHost(self.rs_url),
            UserId(self.user_id),
            admin_token,
        )?;
        match self.port {
            Some(port) => request.with_port(port),
            None => Ok(request),
        }
    }
}
