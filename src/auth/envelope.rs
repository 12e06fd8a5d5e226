use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTitle {
    Success,
    Failed,
}

impl FromStr for StatusTitle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("success") {
            Ok(Self::Success)
        } else if s.eq_ignore_ascii_case("failed") {
            Ok(Self::Failed)
        } else {
            Err(())
        }
    }
}

/// Uniform `{type, title, detail}` shape reported to upstream consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ResultEnvelope {
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<StatusTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResultEnvelope {
    pub fn is_success(&self) -> bool {
        self.title == Some(StatusTitle::Success)
    }
}

#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    inner: ResultEnvelope,
}

impl ResponseBuilder {
    /// Starts an envelope for `status`, matched case-insensitively against
    /// `success` and `failed`. Anything else leaves the title unset.
    pub fn new(status: &str) -> Self {
        Self {
            inner: ResultEnvelope {
                type_code: None,
                title: status.parse().ok(),
                detail: None,
            },
        }
    }

    pub fn success() -> Self {
        Self::new("success")
    }

    pub fn failed() -> Self {
        Self::new("failed")
    }

    pub fn with_type_code(mut self, code: u16) -> Self {
        self.inner.type_code = Some(code);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.inner.detail = Some(detail.into());
        self
    }

    pub fn build(self) -> ResultEnvelope {
        self.inner
    }
}
