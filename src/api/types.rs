//! Shared DTOs for JSON requests and responses.

use serde::{Deserialize, Serialize};

use crate::{highlight::AnalysisResult, ner::EntitySpan, ui::LegendEntry};

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub highlighted_text: String,
    pub highlighted_html: String,
    pub entity_summary: Vec<String>,
    pub summary: String,
    pub entities: Vec<EntityDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityDto {
    pub text: String,
    pub category: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

impl From<&EntitySpan> for EntityDto {
    fn from(span: &EntitySpan) -> Self {
        EntityDto {
            text: span.text.clone(),
            category: span
                .category()
                .map(|c| c.code().to_string())
                .unwrap_or_else(|| span.label.clone()),
            start: span.start,
            end: span.end,
            score: span.score,
        }
    }
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        let summary = result.summary_text();
        AnalyzeResponse {
            entities: result.entities.iter().map(EntityDto::from).collect(),
            highlighted_text: result.highlighted_text,
            highlighted_html: result.highlighted_html,
            entity_summary: result.entity_summary,
            summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleDto {
    pub id: usize,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesDto {
    pub categories: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub backend: String,
}
