pub mod multipart;

use crate::application::{ImageUploadUseCase, TestGenerationUseCase, TextExtractionUseCase};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::git::GitCommitter;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::storage::{content_type_for, resolve_image_path};
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use validator::{Validate, ValidationError};

use self::multipart::read_multipart;

pub const SOURCE_HEADER: &str = "x-casewright-source";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub config: AppConfig,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
    pub test_generation: TestGenerationUseCase,
    pub text_extraction: TextExtractionUseCase,
    pub image_upload: ImageUploadUseCase,
}

impl HttpState {
    pub fn new(
        config: AppConfig,
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        logs: Arc<Mutex<Vec<LogEntry>>>,
    ) -> Result<Self> {
        let repo_dir = std::env::current_dir()?;
        let committer = GitCommitter::new(repo_dir, config.git.clone());
        Ok(Self {
            test_generation: TestGenerationUseCase::new(llm_client),
            text_extraction: TextExtractionUseCase::new(logs.clone()),
            image_upload: ImageUploadUseCase::new(
                config.images_dir.clone(),
                committer,
                logs.clone(),
            ),
            config,
            logs,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(custom(function = "not_blank"), length(max = 200000))]
    pub text: String,
    #[serde(default)]
    pub context: Option<String>,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub ok: bool,
    pub images_dir: String,
    pub enable_git_commit: bool,
    pub enable_git_push: bool,
    pub provider_configured: bool,
}

#[post("/ai-generate")]
async fn ai_generate(
    data: web::Data<HttpState>,
    req: web::Json<GenerateRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    add_log(
        &data.logs,
        "INFO",
        "Generate",
        &format!("Generating from {} chars of text", req.text.len()),
    );

    generate(&data, &req.text, req.context.as_deref()).await
}

#[post("/ai-generate/upload")]
async fn ai_generate_upload(data: web::Data<HttpState>, payload: Multipart) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, data.config.max_upload_bytes).await?;
    let notes = form.text("text").map(str::to_string);
    let context = form.text("context").map(str::to_string);

    let text = match form.take_file("file") {
        Some(file) => {
            add_log(
                &data.logs,
                "INFO",
                "Generate",
                &format!("Extracting text from {} ({} bytes)", file.file_name, file.bytes.len()),
            );
            let state = data.clone();
            let extracted = web::block(move || {
                state.text_extraction.extract(
                    &file.file_name,
                    file.content_type.as_deref(),
                    &file.bytes,
                )
            })
            .await
            .map_err(|e| AppError::Internal(format!("Text extraction was cancelled: {}", e)))?;

            match notes {
                Some(notes) => format!("{}\n\n{}", extracted.text, notes),
                None => extracted.text,
            }
        }
        None => notes.ok_or_else(|| AppError::ValidationError("No file uploaded".to_string()))?,
    };

    generate(&data, &text, context.as_deref()).await
}

async fn generate(data: &HttpState, text: &str, context: Option<&str>) -> Result<HttpResponse> {
    let report = data
        .test_generation
        .execute(&data.config.provider, text, context)
        .await
        .map_err(|e| {
            add_log(&data.logs, "ERROR", "Generate", &e.to_string());
            e
        })?;

    add_log(
        &data.logs,
        "INFO",
        "Generate",
        &format!("Responding with {} output", report.source.as_str()),
    );
    Ok(HttpResponse::Ok()
        .insert_header((SOURCE_HEADER, report.source.as_str()))
        .json(&report.output))
}

#[post("/upload")]
async fn upload_image(data: web::Data<HttpState>, payload: Multipart) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, data.config.max_upload_bytes).await?;
    let Some(image) = form.take_file("image") else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": "No file uploaded" })));
    };

    let receipt = data
        .image_upload
        .execute(Some(&image.file_name), &image.bytes)
        .await?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[get("/images/{name}")]
async fn serve_image(data: web::Data<HttpState>, name: web::Path<String>) -> Result<HttpResponse> {
    let path = resolve_image_path(data.image_upload.images_dir(), &name)?;
    let bytes = tokio::fs::read(&path).await?;
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&path))
        .body(bytes))
}

#[get("/status")]
async fn status(data: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        ok: true,
        images_dir: data.config.images_dir.display().to_string(),
        enable_git_commit: data.config.git.enable_commit,
        enable_git_push: data.config.git.enable_push,
        provider_configured: data.config.provider.is_configured(),
    })
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> HttpResponse {
    let logs = data.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ai_generate)
        .service(ai_generate_upload)
        .service(upload_image)
        .service(serve_image)
        .service(status)
        .service(web::scope("/api").service(get_logs));
}

pub fn start_server(state: web::Data<HttpState>) -> std::io::Result<Server> {
    let bind = (state.config.host.clone(), state.config.port);
    let json_limit = state.config.max_upload_bytes;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local tool: any origin may call it.

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(json_limit))
            .configure(configure)
    })
    .bind(bind)?
    .run();

    Ok(server)
}
