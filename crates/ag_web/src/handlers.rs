use std::sync::Arc;

use ag_core::{AnalyticsSnapshot, HistoryLog, PipelineResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    BoxError, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub url: String,
    pub keywords: Vec<String>,
    pub generated_content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<PipelineResult> for GenerateResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            url: result.url,
            keywords: result.keywords,
            generated_content: result.generated_content,
            timestamp: result.timestamp,
        }
    }
}

pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let url = match payload {
        Ok(Json(GenerateRequest { url: Some(url) })) if !url.trim().is_empty() => url,
        Ok(_) => return Err(ApiError::url_required()),
        Err(rejection) => {
            warn!(error = %rejection, "Rejected generation request body");
            return Err(ApiError::url_required());
        }
    };

    let result = state.pipeline.run(&url).await?;
    Ok(Json(result.into()))
}

/// JSON by default; an HTML page for clients that ask for one.
pub async fn history(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let history = match load_history(&state, "Failed to fetch history").await {
        Ok(history) => history,
        Err(e) => return e.into_response(),
    };

    let wants_html = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |accept| accept.contains("text/html"));

    if wants_html {
        Html(render_history(&history)).into_response()
    } else {
        Json(history).into_response()
    }
}

pub async fn api_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<HistoryLog>> {
    Ok(Json(load_history(&state, "Failed to fetch history").await?))
}

pub async fn analytics(State(state): State<Arc<AppState>>) -> ApiResult<Json<AnalyticsSnapshot>> {
    let history = load_history(&state, "Failed to fetch analytics").await?;
    Ok(Json(ag_storage::summarize(&history)))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Errors raised by the generation route's load-shedding stack.
pub async fn handle_overload(err: BoxError) -> ApiError {
    if err.is::<tower::load_shed::error::Overloaded>() {
        warn!("Generation request shed under load");
        ApiError::rate_limited()
    } else {
        error!(error = %err, "Unhandled middleware error");
        ApiError::internal()
    }
}

async fn load_history(state: &AppState, message: &str) -> ApiResult<HistoryLog> {
    state.storage.read_all().await.map_err(|e| {
        error!(error = %e, "Error reading history");
        ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, message)
    })
}

fn render_history(history: &[PipelineResult]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Content History</title>\n\
         </head>\n<body>\n\
         <h1>Content History</h1>\n",
    );

    if history.is_empty() {
        page.push_str("<p class=\"empty\">No content generated yet.</p>\n");
    }

    for entry in history {
        page.push_str("<article class=\"history-item\">\n");
        page.push_str(&format!(
            "<h2><a href=\"{url}\">{url}</a></h2>\n<time datetime=\"{ts}\">{ts}</time>\n",
            url = escape_html(&entry.url),
            ts = entry.timestamp.to_rfc3339(),
        ));
        page.push_str(&format!(
            "<p class=\"keywords\">{}</p>\n<p class=\"meta\">{} words, {} keywords</p>\n",
            escape_html(&entry.keywords.join(", ")),
            entry.metadata.word_count,
            entry.metadata.keyword_count,
        ));
        for paragraph in entry.generated_content.split("\n\n") {
            page.push_str(&format!("<p>{}</p>\n", escape_html(paragraph.trim())));
        }
        page.push_str("</article>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
