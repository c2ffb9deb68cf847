mod models;
mod services;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, fmt};

use models::{FormInput, PromptMode, Section, Upload};
use services::llm::{LlmClient, LlmError};
use services::{extract, insights, render};

#[derive(Clone)]
struct AppState {
    llm: Arc<LlmClient>,
    mode: PromptMode,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let state = AppState {
        llm: Arc::new(LlmClient::new()),
        mode: PromptMode::from_env(),
    };
    tracing::info!(mode = ?state.mode, "prompt mode selected");

    let app = Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(tower_http::cors::Any)
                        .allow_methods(tower_http::cors::AllowMethods::any())
                        .allow_headers(tower_http::cors::AllowHeaders::any()),
                ),
        );

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::form_page(state.mode))
}

async fn health_check() -> &'static str {
    "OK"
}

/// One generation run per request: gate, extract, generate, render. The
/// gates fire before any network call, in this order: missing API key,
/// missing required fields, empty section selection (sectioned mode only).
async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, StatusCode> {
    let (form, upload) = read_form(multipart).await?;

    if !state.llm.has_api_key() {
        return Ok(Html(render::error_page(
            &LlmError::MissingApiKey.user_message(),
        )));
    }
    if let Some(warning) = validate(&form, state.mode) {
        return Ok(Html(render::warning_page(warning)));
    }

    let doc_text = match &upload {
        Some(upload) => extract::extract_text(&upload.data, &upload.content_type),
        None => String::new(),
    };

    match insights::generate_insights(&form, &doc_text, state.mode, &state.llm).await {
        Ok(reports) => Ok(Html(render::results_page(&reports, &form.competitor_list()))),
        Err(err) => {
            tracing::error!(error = %err, "insight generation failed");
            Ok(Html(render::error_page(&err.user_message())))
        }
    }
}

fn validate(form: &FormInput, mode: PromptMode) -> Option<&'static str> {
    if form.product_name.trim().is_empty() || form.company_url.trim().is_empty() {
        return Some("Please fill in at least Product Name and Company URL.");
    }
    if mode == PromptMode::Sectioned && form.sections.is_empty() {
        return Some("Please select at least one section to include in the output.");
    }
    None
}

/// Collect the multipart form into a [`FormInput`] plus the optional upload.
/// Repeated `sections` fields keep the user's selection order.
async fn read_form(mut multipart: Multipart) -> Result<(FormInput, Option<Upload>), StatusCode> {
    let mut form = FormInput::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "document" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                // Browsers send an empty part when no file was chosen.
                if !data.is_empty() {
                    upload = Some(Upload {
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            "sections" => {
                let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                if let Some(section) = Section::from_key(&value) {
                    if !form.sections.contains(&section) {
                        form.sections.push(section);
                    }
                }
            }
            _ => {
                let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                match name.as_str() {
                    "product_name" => form.product_name = value,
                    "company_url" => form.company_url = value,
                    "product_category" => form.product_category = value,
                    "competitors" => form.competitors = value,
                    "value_proposition" => form.value_proposition = value,
                    "target_customer" => form.target_customer = value,
                    "manual_leaders" => form.manual_leaders = value,
                    _ => {}
                }
            }
        }
    }

    Ok((form, upload))
}
