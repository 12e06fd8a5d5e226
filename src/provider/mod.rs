pub mod error;
pub mod revocation;

use url::Url;

use crate::core::models::RevocationRequest;
use crate::http::client::Transport;

use error::DispatchError;

pub const DEFAULT_REVOCATION_PATH: &str = "/admin/revokeToken";

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    revocation_path: String,
}

impl DispatchConfig {
    /// The path is shared by every resource server; a missing leading `/`
    /// is added.
    pub fn new(revocation_path: &str) -> Self {
        let trimmed = revocation_path.trim().trim_start_matches('/');
        Self {
            revocation_path: format!("/{}", trimmed),
        }
    }

    pub fn revocation_path(&self) -> &str {
        &self.revocation_path
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REVOCATION_PATH)
    }
}

/// Tells resource servers to drop a user's tokens.
///
/// Holds no per-call state, so one instance (wrapped in an `Arc`) serves
/// any number of concurrent callers. The transport is built once and shared.
#[derive(Debug)]
pub struct RevocationDispatcher<T> {
    transport: T,
    config: DispatchConfig,
}

impl<T: Transport> RevocationDispatcher<T> {
    pub fn new(transport: T, config: DispatchConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub(crate) fn revocation_url(&self, req: &RevocationRequest) -> Result<Url, DispatchError> {
        let host = req.host().as_ref();
        let mut url = Url::parse(&format!("https://{}", host))?;
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(DispatchError::InvalidRequest(format!(
                "resource server host must not carry a path: {}",
                host
            )));
        }
        // `Url` drops a default `:443`, so the raw host is checked as well.
        // Colons inside an IPv6 literal are allowed.
        let after_literal = host.rsplit(']').next().unwrap_or(host);
        if !url.username().is_empty() || url.password().is_some() || url.port().is_some() || after_literal.contains(':')
        {
            return Err(DispatchError::InvalidRequest(format!(
                "resource server host must be a bare host name: {}",
                host
            )));
        }
        url.set_port(Some(req.port()))
            .map_err(|_| DispatchError::InvalidRequest("cannot set port on resource server address".into()))?;
        url.set_path(self.config.revocation_path());
        Ok(url)
    }
}
