pub mod bundles;
pub mod fallback;
mod hashing;
pub mod normalizer;
pub(crate) mod prompts;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, ProviderResult};
use crate::domain::test_case::TestCaseDocument;
use crate::infrastructure::llm_clients::LLMClient;

use bundles::Domain;
use fallback::{generate_fallback, matched_domains};
use hashing::prompt_digest;
use normalizer::{normalize, raw_body, FallbackReason, Normalization, ParseStrategy};
use prompts::{build_system_prompt, build_user_prompt};

/// Body of a generation response. Serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedOutput {
    Document(TestCaseDocument),
    Json(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    ProviderSchema,
    ProviderJson,
    ProviderRaw,
    Fallback,
}

impl OutputSource {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSource::ProviderSchema => "provider-schema",
            OutputSource::ProviderJson => "provider-json",
            OutputSource::ProviderRaw => "provider-raw",
            OutputSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationDiagnostics {
    pub prompt_digest: String,
    pub prompt_len: usize,
    pub extracted_from: Option<&'static str>,
    pub parse_strategy: Option<ParseStrategy>,
    pub fallback_reason: Option<FallbackReason>,
    pub matched_domains: Vec<Domain>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub output: GeneratedOutput,
    pub source: OutputSource,
    pub diagnostics: GenerationDiagnostics,
}

pub struct TestGenerationUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl TestGenerationUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        text: &str,
        context: Option<&str>,
    ) -> Result<GenerationReport> {
        let system_prompt = build_system_prompt();
        let user_prompt = build_user_prompt(text, context);
        let prompt_len = system_prompt.len() + user_prompt.len();
        let digest = prompt_digest(&format!("{}\n\n{}", system_prompt, user_prompt));
        info!(
            prompt_digest = %digest,
            prompt_len,
            "Generating test cases"
        );

        let result = self
            .llm_client
            .generate(config, &system_prompt, &user_prompt)
            .await;
        let mut report = resolve(&result, text)?;
        report.diagnostics.prompt_digest = digest;
        report.diagnostics.prompt_len = prompt_len;
        Ok(report)
    }
}

/// Turns a provider result into the response body. Pure: the same result and
/// text always yield the same report. Provider errors are returned as
/// [`AppError::Upstream`] and never replaced by fallback content.
pub fn resolve(result: &ProviderResult, text: &str) -> Result<GenerationReport> {
    let mut diagnostics = GenerationDiagnostics::default();

    let (output, source) = match normalize(result) {
        Normalization::Upstream(failure) => {
            warn!(status = ?failure.status, detail = %failure.message, "Provider returned an error");
            return Err(AppError::Upstream(failure));
        }
        Normalization::PassThrough(value) => {
            (GeneratedOutput::Json(value), OutputSource::ProviderSchema)
        }
        Normalization::Parsed {
            value,
            field,
            strategy,
        } => {
            diagnostics.extracted_from = Some(field);
            diagnostics.parse_strategy = Some(strategy);
            (GeneratedOutput::Json(value), OutputSource::ProviderJson)
        }
        Normalization::Raw { text: raw, field } => {
            diagnostics.extracted_from = Some(field);
            info!(field, "Provider text is not JSON; returning it raw");
            (GeneratedOutput::Json(raw_body(&raw)), OutputSource::ProviderRaw)
        }
        Normalization::Fallback(reason) => {
            if reason == FallbackReason::NoExtractableText {
                warn!("Provider payload has no recognizable text; using keyword fallback");
            }
            diagnostics.fallback_reason = Some(reason);
            diagnostics.matched_domains = matched_domains(text);
            (
                GeneratedOutput::Document(generate_fallback(text)),
                OutputSource::Fallback,
            )
        }
    };

    Ok(GenerationReport {
        output,
        source,
        diagnostics,
    })
}
