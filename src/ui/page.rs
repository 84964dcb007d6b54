//! Askama model for the single-page form UI.

use askama::Template;
use serde::Deserialize;

use super::{legend, Instruction, LegendEntry, EXAMPLES, INSTRUCTIONS};
use crate::highlight::AnalysisResult;

/// Tabs of the page, selected with `?tab=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Main,
    Legend,
    Help,
}

impl Tab {
    pub fn is_main(&self) -> bool {
        matches!(self, Tab::Main)
    }

    pub fn is_legend(&self) -> bool {
        matches!(self, Tab::Legend)
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Tab::Help)
    }
}

/// Result regions; absent until a text was analysed.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub highlighted_html: String,
    pub summary: String,
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            highlighted_html: result.highlighted_html.clone(),
            summary: result.summary_text(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub tab: Tab,
    pub input: String,
    pub result: Option<ResultView>,
    pub error: Option<String>,
    pub examples: &'static [&'static str],
    pub legend: Vec<LegendEntry>,
    pub instructions: &'static [Instruction],
}

impl IndexPage {
    pub fn new(tab: Tab, input: impl Into<String>) -> Self {
        Self {
            tab,
            input: input.into(),
            result: None,
            error: None,
            examples: &EXAMPLES,
            legend: legend(),
            instructions: INSTRUCTIONS,
        }
    }

    pub fn with_result(mut self, result: &AnalysisResult) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
