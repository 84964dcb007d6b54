//! HTTP route handlers for Axum.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    api::types::{AnalyzeRequest, AnalyzeResponse, CategoriesDto, ExampleDto, HealthDto},
    highlight::{analyze, AnalysisResult},
    ui::{self, IndexPage, Tab},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub tab: Option<Tab>,
    pub example: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
}

pub async fn index(Query(query): Query<PageQuery>) -> Response {
    let input = query.example.and_then(ui::example).unwrap_or_default();
    let page = IndexPage::new(query.tab.unwrap_or_default(), input);
    render(StatusCode::OK, &page)
}

pub async fn submit_form(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let page = IndexPage::new(Tab::Main, form.text.clone());
    match run_analysis(&state, form.text).await {
        Ok(result) => render(StatusCode::OK, &page.with_result(&result)),
        Err((status, message)) => render(status, &page.with_error(message)),
    }
}

pub async fn analyze_json(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalyzeResponse> {
    let result = run_analysis(&state, request.text).await?;
    Ok(Json(result.into()))
}

pub async fn list_examples() -> Json<Vec<ExampleDto>> {
    let examples = ui::EXAMPLES
        .iter()
        .enumerate()
        .map(|(id, text)| ExampleDto { id, text: *text })
        .collect();
    Json(examples)
}

pub async fn list_categories() -> Json<CategoriesDto> {
    Json(CategoriesDto {
        categories: ui::legend(),
    })
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        backend: state.ner.name().to_string(),
    })
}

async fn run_analysis(
    state: &AppState,
    text: String,
) -> Result<AnalysisResult, (StatusCode, String)> {
    if !state.settings.accepts(&text) {
        warn!(limit = state.settings.max_input_chars, "rejecting oversized input");
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "Текст задовгий: максимум {} символів.",
                state.settings.max_input_chars
            ),
        ));
    }
    let ner = state.ner.clone();
    let result = tokio::task::spawn_blocking(move || analyze(ner.as_ref(), &text))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match result {
        Ok(result) => {
            info!(entities = result.entities.len(), "analysed text");
            Ok(result)
        }
        Err(err) => {
            error!(%err, "entity extraction failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
        }
    }
}

fn render(status: StatusCode, page: &IndexPage) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(%err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
