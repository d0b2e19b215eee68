use serde::Serialize;

use crate::record::{Field, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Records exactly as the store returned them, newest first.
pub fn render_json(records: &[Record]) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]".to_vec());
    out.push(b'\n');
    out
}

#[derive(Clone, Debug, Serialize)]
pub struct RecordSummary {
    pub total: usize,
    pub with_score: usize,
    pub average_score: Option<f64>,
}

/// Count and mean score of the given records; scores that are not numbers
/// are left out of the mean.
pub fn summarize(records: &[Record]) -> RecordSummary {
    let scores: Vec<f64> = records
        .iter()
        .filter_map(|r| r.get(Field::Score))
        .filter_map(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .collect();
    let average_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };
    RecordSummary {
        total: records.len(),
        with_score: scores.len(),
        average_score,
    }
}
