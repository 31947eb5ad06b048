//! Offline ranking-quality metrics.
//!
//! Recall@K and AP@K compare a predicted ranking against a hand-labeled,
//! unordered set of relevant item names. Membership is exact string equality.

use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCase {
    /// Job description or query the labels were written for.
    pub query: String,
    pub expected: Vec<String>,
    pub predicted: Vec<String>,
}

impl EvaluationCase {
    pub fn new(query: &str, expected: &[&str], predicted: &[&str]) -> Self {
        Self {
            query: query.to_string(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            predicted: predicted.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub recall: f64,
    pub average_precision: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub k: usize,
    pub cases: Vec<CaseReport>,
    pub mean_recall: f64,
    pub mean_average_precision: f64,
}

fn check_inputs(expected: &[String], k: usize) -> Result<HashSet<&str>, InvalidInputError> {
    if k == 0 {
        return Err(InvalidInputError::ZeroK);
    }
    let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();
    if expected.is_empty() {
        return Err(InvalidInputError::EmptyExpected);
    }
    Ok(expected)
}

/// Share of distinct expected items that appear in the first `k` predictions.
pub fn recall_at_k(
    expected: &[String],
    predicted: &[String],
    k: usize,
) -> Result<f64, InvalidInputError> {
    let expected = check_inputs(expected, k)?;
    let found: HashSet<&str> = predicted
        .iter()
        .take(k)
        .map(String::as_str)
        .filter(|p| expected.contains(p))
        .collect();
    Ok(found.len() as f64 / expected.len() as f64)
}

/// Average precision over the first `k` predictions, normalized by
/// `min(distinct expected, k)`, the same set view recall uses. A prediction
/// repeating an earlier hit does not count again.
pub fn average_precision_at_k(
    expected: &[String],
    predicted: &[String],
    k: usize,
) -> Result<f64, InvalidInputError> {
    let expected = check_inputs(expected, k)?;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut hits = 0usize;
    let mut score = 0.0;

    for (i, p) in predicted.iter().take(k).enumerate() {
        if expected.contains(p.as_str()) && seen.insert(p.as_str()) {
            hits += 1;
            score += hits as f64 / (i + 1) as f64;
        }
    }
    Ok(score / expected.len().min(k) as f64)
}

pub fn evaluate(cases: &[EvaluationCase], k: usize) -> Result<EvaluationSummary, InvalidInputError> {
    let reports = cases
        .iter()
        .map(|case| {
            Ok(CaseReport {
                recall: recall_at_k(&case.expected, &case.predicted, k)?,
                average_precision: average_precision_at_k(&case.expected, &case.predicted, k)?,
            })
        })
        .collect::<Result<Vec<_>, InvalidInputError>>()?;

    let mean = |f: fn(&CaseReport) -> f64| {
        if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(f).sum::<f64>() / reports.len() as f64
        }
    };
    let mean_recall = mean(|r| r.recall);
    let mean_average_precision = mean(|r| r.average_precision);

    Ok(EvaluationSummary {
        k,
        cases: reports,
        mean_recall,
        mean_average_precision,
    })
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hand-labeled cases for three job descriptions.
pub fn builtin_cases() -> Vec<EvaluationCase> {
    vec![
        EvaluationCase::new(
            "Sales Manager responsible for leading a B2B sales team",
            &["Sales Personality Test", "B2B Sales Simulation", "Leadership Potential Test"],
            &["Leadership Potential Test", "Sales Personality Test", "Time Management Test"],
        ),
        EvaluationCase::new(
            "Software Developer with focus on Python and problem-solving",
            &["Coding Simulation - Python", "Problem Solving Test", "Logical Reasoning Test"],
            &["Problem Solving Test", "Logical Reasoning Test", "Software Design Aptitude Test"],
        ),
        EvaluationCase::new(
            "Customer support executive for voice process",
            &["Communication Skills Test", "Customer Service Simulation", "Typing Speed Test"],
            &["Typing Speed Test", "Communication Skills Test", "Customer Empathy Test"],
        ),
    ]
}

/// Read cases from a JSON array of `{query, expected, predicted}` objects.
pub fn load_cases(path: &Path) -> anyhow::Result<Vec<EvaluationCase>> {
    use anyhow::Context;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read evaluation cases from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid evaluation cases in {}", path.display()))
}
