//! Token-classification NER backed by an ONNX export of a transformer model.
//!
//! The model directory must contain `model.onnx`, `tokenizer.json` and the
//! Hugging Face `config.json` carrying the `id2label` table.

use std::{collections::HashMap, path::Path, sync::Arc};

use ndarray::{Array2, Axis, CowArray};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::{
    bio::{self, TokenTag},
    chunk::fitting_chunks,
    EntitySpan, Ner, NerError,
};

/// Characters per inference window before token counts are checked.
const MAX_CHUNK_CHARS: usize = 400;
/// Position embeddings of BERT-style encoders.
const MAX_SEQUENCE_TOKENS: usize = 512;

#[derive(Debug, Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

pub struct OnnxNer {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    wants_token_types: bool,
}

impl OnnxNer {
    pub fn load(model_dir: &Path) -> Result<Self, NerError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        let raw_config = std::fs::read_to_string(&config_path)
            .map_err(|e| NerError::ModelLoad(format!("{}: {e}", config_path.display())))?;
        let config: ModelConfig = serde_json::from_str(&raw_config)
            .map_err(|e| NerError::ModelLoad(format!("{}: {e}", config_path.display())))?;
        let labels = label_table(config.id2label)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| NerError::ModelLoad(format!("{}: {e}", tokenizer_path.display())))?;

        let environment = Arc::new(
            Environment::builder()
                .with_name("uk-ner-highlight")
                .build()
                .map_err(|e| NerError::ModelLoad(e.to_string()))?,
        );
        let session = SessionBuilder::new(&environment)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_model_from_file(&model_path))
            .map_err(|e| NerError::ModelLoad(format!("{}: {e}", model_path.display())))?;
        let wants_token_types = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        info!(path = %model_dir.display(), labels = labels.len(), "loaded ONNX NER model");
        Ok(Self {
            session,
            tokenizer,
            labels,
            wants_token_types,
        })
    }

    fn token_count(&self, text: &str) -> Result<usize, NerError> {
        self.tokenizer
            .encode(text, true)
            .map(|encoding| encoding.len())
            .map_err(|e| NerError::Tokenization(e.to_string()))
    }

    fn classify(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NerError::Tokenization(e.to_string()))?;
        let len = encoding.get_ids().len();
        if len == 0 {
            return Ok(Vec::new());
        }

        let as_i64 = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();
        let shape = (1, len);
        let ids = CowArray::from(
            Array2::from_shape_vec(shape, as_i64(encoding.get_ids()))
                .map_err(|e| NerError::Inference(e.to_string()))?
                .into_dyn(),
        );
        let mask = CowArray::from(
            Array2::from_shape_vec(shape, as_i64(encoding.get_attention_mask()))
                .map_err(|e| NerError::Inference(e.to_string()))?
                .into_dyn(),
        );
        let type_ids = CowArray::from(
            Array2::from_shape_vec(shape, as_i64(encoding.get_type_ids()))
                .map_err(|e| NerError::Inference(e.to_string()))?
                .into_dyn(),
        );

        let allocator = self.session.allocator();
        let mut inputs = vec![
            Value::from_array(allocator, &ids).map_err(|e| NerError::Inference(e.to_string()))?,
            Value::from_array(allocator, &mask).map_err(|e| NerError::Inference(e.to_string()))?,
        ];
        if self.wants_token_types {
            inputs.push(
                Value::from_array(allocator, &type_ids)
                    .map_err(|e| NerError::Inference(e.to_string()))?,
            );
        }
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| NerError::Inference(e.to_string()))?;
        let logits = outputs
            .first()
            .ok_or_else(|| NerError::Inference("model produced no outputs".into()))?
            .try_extract::<f32>()
            .map_err(|e| NerError::Inference(e.to_string()))?;
        let logits = logits.view();
        // [batch, tokens, labels] -> [tokens, labels]
        let logits = logits.index_axis(Axis(0), 0);

        let offsets = encoding.get_offsets();
        let mut tags = Vec::with_capacity(len);
        for (row, &(start, end)) in logits.outer_iter().zip(offsets) {
            let (best, score) = softmax_argmax(row.iter().copied());
            let tag = self
                .labels
                .get(best)
                .map(String::as_str)
                .unwrap_or("O");
            tags.push(TokenTag {
                tag,
                start,
                end,
                score,
            });
        }
        Ok(bio::decode(text, &tags))
    }
}

impl Ner for OnnxNer {
    fn name(&self) -> &str {
        "onnx"
    }

    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        let mut spans = Vec::new();
        let windows = fitting_chunks(text, MAX_CHUNK_CHARS, |window| {
            self.token_count(window)
                .map(|count| count <= MAX_SEQUENCE_TOKENS)
        })?;
        for chunk in windows {
            let local = self.classify(chunk.text)?;
            debug!(offset = chunk.offset, found = local.len(), "classified chunk");
            spans.extend(local.into_iter().filter_map(|span| {
                EntitySpan::new(
                    text,
                    chunk.offset + span.start,
                    chunk.offset + span.end,
                    span.label,
                )
                .map(|shifted| shifted.with_score(span.score))
            }));
        }
        Ok(spans)
    }
}

fn label_table(id2label: HashMap<String, String>) -> Result<Vec<String>, NerError> {
    let mut indexed = id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .map_err(|_| NerError::ModelLoad(format!("non-numeric label id {id:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    indexed.sort_by_key(|(id, _)| *id);
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

fn softmax_argmax(logits: impl Iterator<Item = f32>) -> (usize, f32) {
    let values: Vec<f32> = logits.collect();
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let denom: f32 = values.iter().map(|v| (v - max).exp()).sum();
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, v)| (idx, (v - max).exp() / denom))
        .unwrap_or((0, 0.0))
}
