//! Medicine-detail extraction from model output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Analysis errors.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Request failed: {0}")]
    Request(String),
}

pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Partial medicine record inferred by the model.
///
/// Missing keys parse as `None` and are left untouched when the host
/// merges the facts into a form; the form's own id is never part of the
/// payload. A failed parse produces no facts at all, so a partial merge
/// cannot happen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MedicineFacts {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub ingredients: Option<String>,
    pub specs: Option<String>,
    pub indications: Option<String>,
    pub usage: Option<String>,
    pub expiry_date: Option<String>,
}

impl MedicineFacts {
    /// True when the model produced nothing usable.
    pub fn is_empty(&self) -> bool {
        self == &MedicineFacts::default()
    }
}

/// Parse model output into medicine facts.
///
/// Finds the first JSON object in the response, in case the model wraps
/// it in extra prose.
pub fn parse_medicine_facts(raw: &str) -> AnalyzeResult<MedicineFacts> {
    let json_start = raw
        .find('{')
        .ok_or_else(|| AnalyzeError::InvalidFormat("No JSON object found in response".into()))?;
    let json_end = raw
        .rfind('}')
        .ok_or_else(|| AnalyzeError::InvalidFormat("No closing brace found in response".into()))?;

    let json_slice = &raw[json_start..=json_end];
    let facts: MedicineFacts = serde_json::from_str(json_slice)?;

    Ok(facts)
}

/// Mock analyzer for testing without a network call.
pub struct MockAnalyzer;

impl MockAnalyzer {
    /// Answer from a small built-in table (for testing).
    pub fn analyze(input: &str) -> MedicineFacts {
        let input_lower = input.to_lowercase();

        let known: &[(&str, MedicineFacts)] = &[
            (
                "ibuprofen",
                MedicineFacts {
                    name: Some("Ibuprofen Sustained Release Capsules".into()),
                    brand: Some("Advil".into()),
                    ingredients: Some("Ibuprofen".into()),
                    specs: Some("0.3g x 20 capsules".into()),
                    indications: Some("Mild to moderate pain, fever".into()),
                    usage: Some("One capsule every 12 hours".into()),
                    expiry_date: Some(String::new()),
                },
            ),
            (
                "paracetamol",
                MedicineFacts {
                    name: Some("Paracetamol Tablets".into()),
                    brand: Some("Panadol".into()),
                    ingredients: Some("Acetaminophen".into()),
                    specs: Some("500mg x 16 tablets".into()),
                    indications: Some("Fever, headache, mild pain".into()),
                    usage: Some("One to two tablets every 4-6 hours, max 8 per day".into()),
                    expiry_date: Some(String::new()),
                },
            ),
            (
                "amoxicillin",
                MedicineFacts {
                    name: Some("Amoxicillin Capsules".into()),
                    brand: Some("Amoxil".into()),
                    ingredients: Some("Amoxicillin trihydrate".into()),
                    specs: Some("0.25g x 24 capsules".into()),
                    indications: Some("Bacterial infections of the ear, nose, throat".into()),
                    usage: Some("One capsule every 8 hours, finish the course".into()),
                    expiry_date: Some(String::new()),
                },
            ),
        ];

        for (pattern, facts) in known {
            if input_lower.contains(pattern) {
                return facts.clone();
            }
        }

        MedicineFacts {
            name: Some(input.trim().to_string()),
            expiry_date: Some(String::new()),
            ..Default::default()
        }
    }
}
