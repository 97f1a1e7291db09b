use super::LLMClient;
use crate::domain::error::UpstreamFailure;
use crate::domain::llm_config::{AuthMode, LLMConfig, ProviderFormat, ProviderResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

#[derive(Serialize)]
struct GenericRequest<'a> {
    prompt: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

pub struct HttpProviderClient {
    client: reqwest::Client,
}

impl HttpProviderClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("casewright/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Chat requests keep the two prompts as separate messages; the other
    /// formats take a single text, so they are joined.
    fn request_body(config: &LLMConfig, system_prompt: &str, user_prompt: &str) -> Value {
        let model = config.model.as_deref().filter(|m| !m.trim().is_empty());
        let combined = combined_prompt(system_prompt, user_prompt);
        let body = match config.format {
            ProviderFormat::Generic => serde_json::to_value(GenericRequest {
                prompt: &combined,
                input: &combined,
                model,
            }),
            ProviderFormat::Chat => serde_json::to_value(ChatRequest {
                model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: system_prompt,
                    },
                    ChatMessage {
                        role: "user",
                        content: user_prompt,
                    },
                ],
            }),
            ProviderFormat::Gemini => serde_json::to_value(GeminiRequest {
                contents: vec![GeminiContent {
                    parts: vec![GeminiPart { text: &combined }],
                }],
            }),
        };
        body.unwrap_or_else(|_| json!({ "prompt": combined }))
    }

    /// Scheme, host and path only; the query string may carry the key.
    fn display_endpoint(url: &Url) -> String {
        let mut shown = format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""));
        if let Some(port) = url.port() {
            shown.push_str(&format!(":{}", port));
        }
        shown.push_str(url.path());
        shown
    }

    /// Success bodies always reach the normalizer as an object.
    fn payload_from_text(text: String) -> Value {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) if value.is_object() => value,
            _ => json!({ "rawText": text }),
        }
    }
}

fn combined_prompt(system_prompt: &str, user_prompt: &str) -> String {
    if system_prompt.trim().is_empty() {
        return user_prompt.to_string();
    }
    format!("{}\n\n{}", system_prompt, user_prompt)
}

impl Default for HttpProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for HttpProviderClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        system_prompt: &str,
        user_prompt: &str,
    ) -> ProviderResult {
        let Some((endpoint, api_key)) = config.credentials() else {
            info!("AI provider not configured, skipping upstream call");
            return ProviderResult::Absent;
        };

        let url = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "AI provider endpoint is not a valid URL");
                return ProviderResult::Error(UpstreamFailure::transport(format!(
                    "Invalid provider endpoint: {}",
                    e
                )));
            }
        };

        info!(
            endpoint = %Self::display_endpoint(&url),
            prompt_len = system_prompt.len() + user_prompt.len(),
            "Calling AI provider"
        );

        let mut request = self
            .client
            .post(url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&Self::request_body(config, system_prompt, user_prompt));
        request = match AuthMode::for_credential(api_key) {
            AuthMode::QueryParam => request.query(&[("key", api_key)]),
            AuthMode::Bearer => request.bearer_auth(api_key),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                warn!(error = %e, timeout = e.is_timeout(), "AI provider request failed");
                return ProviderResult::Error(UpstreamFailure::transport(format!(
                    "Request failed: {}",
                    e
                )));
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("<failed to read response body: {}>", e.without_url()),
            };
            warn!(status = status.as_u16(), "AI provider returned an error status");
            return ProviderResult::Error(UpstreamFailure {
                status: Some(status.as_u16()),
                status_text,
                message: format!("API error ({})", status),
                body: Some(body),
            });
        }

        match response.text().await {
            Ok(text) => ProviderResult::Success(Self::payload_from_text(text)),
            Err(e) => {
                let e = e.without_url();
                warn!(error = %e, "Failed to read AI provider response body");
                ProviderResult::Error(UpstreamFailure {
                    status: Some(status.as_u16()),
                    status_text,
                    message: format!("Failed to read response body: {}", e),
                    body: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::sync::{Arc, Mutex};

    async fn schema_reply() -> HttpResponse {
        HttpResponse::Ok().json(json!({ "positive": [{ "title": "Works" }] }))
    }

    async fn plain_reply() -> HttpResponse {
        HttpResponse::Ok().content_type("text/plain").body("not json at all")
    }

    async fn failing_reply() -> HttpResponse {
        HttpResponse::InternalServerError().body("{\"error\":\"boom\"}")
    }

    async fn slow_reply() -> HttpResponse {
        tokio::time::sleep(Duration::from_secs(3)).await;
        HttpResponse::Ok().json(json!({ "text": "late" }))
    }

    async fn echo_reply(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
        let authorization = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        HttpResponse::Ok().json(json!({
            "authorization": authorization,
            "query": req.query_string(),
            "body": body.into_inner(),
        }))
    }

    fn spawn_provider() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/schema", web::post().to(schema_reply))
                .route("/plain", web::post().to(plain_reply))
                .route("/fail", web::post().to(failing_reply))
                .route("/slow", web::post().to(slow_reply))
                .route("/echo", web::post().to(echo_reply))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn config(endpoint: String, api_key: &str) -> LLMConfig {
        LLMConfig {
            endpoint: Some(endpoint),
            api_key: Some(api_key.to_string()),
            timeout_secs: 5,
            ..LLMConfig::default()
        }
    }

    fn success(result: ProviderResult) -> Value {
        match result {
            ProviderResult::Success(value) => value,
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_unconfigured_provider_is_absent() {
        let client = HttpProviderClient::new();
        let result = client.generate(&LLMConfig::default(), "", "prompt").await;
        assert_eq!(result, ProviderResult::Absent);
    }

    #[actix_web::test]
    async fn test_json_body_is_returned_as_success() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let value = success(client.generate(&config(format!("{}/schema", base), "sk-test"), "", "p").await);
        assert_eq!(value["positive"][0]["title"], json!("Works"));
    }

    #[actix_web::test]
    async fn test_non_json_body_is_wrapped_as_raw_text() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let value = success(client.generate(&config(format!("{}/plain", base), "sk-test"), "", "p").await);
        assert_eq!(value, json!({ "rawText": "not json at all" }));
    }

    #[actix_web::test]
    async fn test_error_status_is_captured_with_body() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        match client.generate(&config(format!("{}/fail", base), "sk-test"), "", "p").await {
            ProviderResult::Error(failure) => {
                assert_eq!(failure.status, Some(500));
                assert_eq!(failure.status_text, "Internal Server Error");
                assert_eq!(failure.body.as_deref(), Some("{\"error\":\"boom\"}"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_bearer_auth_for_plain_tokens() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let value = success(client.generate(&config(format!("{}/echo", base), "sk-test"), "sys", "hello").await);
        assert_eq!(value["authorization"], json!("Bearer sk-test"));
        assert_eq!(value["query"], json!(""));
        assert_eq!(value["body"]["prompt"], json!("sys\n\nhello"));
        assert_eq!(value["body"]["input"], value["body"]["prompt"]);
    }

    #[actix_web::test]
    async fn test_query_param_auth_for_google_keys() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let mut cfg = config(format!("{}/echo", base), "AIzaTestKey");
        cfg.format = ProviderFormat::Gemini;
        let value = success(client.generate(&cfg, "sys", "hello").await);
        assert_eq!(value["authorization"], Value::Null);
        assert_eq!(value["query"], json!("key=AIzaTestKey"));
        assert_eq!(value["body"]["contents"][0]["parts"][0]["text"], json!("sys\n\nhello"));
    }

    #[actix_web::test]
    async fn test_timeout_becomes_error_payload() {
        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let mut cfg = config(format!("{}/slow", base), "sk-test");
        cfg.timeout_secs = 1;
        match client.generate(&cfg, "", "p").await {
            ProviderResult::Error(failure) => {
                assert_eq!(failure.status, None);
                assert!(failure.message.starts_with("Request failed"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_unreachable_endpoint_becomes_error_payload() {
        let client = HttpProviderClient::new();
        let result = client
            .generate(&config("http://127.0.0.1:9/generate".to_string(), "sk-test"), "", "p")
            .await;
        assert!(matches!(result, ProviderResult::Error(ref f) if f.status.is_none()));
    }

    #[test]
    fn test_chat_body_carries_system_and_user_messages() {
        let cfg = LLMConfig {
            format: ProviderFormat::Chat,
            model: Some("gpt-test".to_string()),
            ..LLMConfig::default()
        };
        let body = HttpProviderClient::request_body(&cfg, "system rules", "story text");
        assert_eq!(body["model"], json!("gpt-test"));
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][0]["content"], json!("system rules"));
        assert_eq!(body["messages"][1]["role"], json!("user"));
        assert_eq!(body["messages"][1]["content"], json!("story text"));
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_blank_system_prompt_is_not_joined() {
        let body = HttpProviderClient::request_body(&LLMConfig::default(), " ", "story text");
        assert_eq!(body["prompt"], json!("story text"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[actix_web::test]
    async fn test_credential_never_reaches_logs_or_errors() {
        let key = "AIzaSecretKey1234567890";
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let base = spawn_provider();
        let client = HttpProviderClient::new();
        let value = success(client.generate(&config(format!("{}/echo", base), key), "", "p").await);
        assert_eq!(value["query"], json!(format!("key={}", key)));

        let unreachable = config("http://127.0.0.1:9/generate".to_string(), key);
        match client.generate(&unreachable, "", "p").await {
            ProviderResult::Error(failure) => {
                assert!(!failure.message.contains(key));
                assert!(!format!("{:?}", failure).contains(key));
            }
            other => panic!("expected error, got {:?}", other),
        }

        let captured = logs.text();
        assert!(captured.contains("Calling AI provider"));
        assert!(captured.contains("AI provider request failed"));
        assert!(!captured.contains(key));
    }

    #[test]
    fn test_display_endpoint_drops_query() {
        let url = Url::parse("https://llm.example.test:8443/v1/gen?key=secret").unwrap();
        assert_eq!(
            HttpProviderClient::display_endpoint(&url),
            "https://llm.example.test:8443/v1/gen"
        );
    }
}
