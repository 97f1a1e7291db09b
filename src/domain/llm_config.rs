use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::error::UpstreamFailure;

/// Request body shape sent to the provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFormat {
    #[default]
    Generic,
    Chat,
    Gemini,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Credential travels as the `key` query parameter.
    QueryParam,
    Bearer,
}

impl AuthMode {
    /// Google-style API keys go in the query string; everything else is a
    /// bearer token.
    pub fn for_credential(credential: &str) -> Self {
        if credential.trim().starts_with("AIza") {
            AuthMode::QueryParam
        } else {
            AuthMode::Bearer
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct LLMConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Zero would make every request time out at once.
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    pub format: ProviderFormat,
    pub model: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 60,
            format: ProviderFormat::Generic,
            model: None,
        }
    }
}

impl LLMConfig {
    /// Endpoint and credential, when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let api_key = self.api_key.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        Some((endpoint, api_key))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Outcome of one provider call. Never a document: the normalizer has to
/// discriminate it first.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    /// No endpoint or credential configured; nothing was sent.
    Absent,
    Success(Value),
    Error(UpstreamFailure),
}
