pub mod http_provider;

use crate::domain::llm_config::{LLMConfig, ProviderResult};
use async_trait::async_trait;

pub use http_provider::HttpProviderClient;

/// One outbound generation call. Implementations never fail: transport and
/// status errors come back as [`ProviderResult::Error`].
#[async_trait]
pub trait LLMClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        system_prompt: &str,
        user_prompt: &str,
    ) -> ProviderResult;
}
