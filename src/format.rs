//! Maps matched catalog rows to the response shape clients see.
//!
//! Formatting never fails: blank or unparseable cells fall back to fixed
//! defaults row by row.

use crate::catalog::CatalogItem;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const DEFAULT_URL: &str = "https://www.shl.com";
pub const DEFAULT_SUPPORT: &str = "No";
pub const DEFAULT_TEST_TYPE: &str = "Other";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub url: String,
    pub adaptive_support: String,
    pub description: String,
    /// Minutes; 0 when unknown.
    pub duration: u32,
    pub remote_support: String,
    pub test_type: Vec<String>,
}

impl RecommendationResult {
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            url: non_blank(item.url.as_deref())
                .unwrap_or(DEFAULT_URL)
                .to_string(),
            adaptive_support: non_blank(item.adaptive_support.as_deref())
                .unwrap_or(DEFAULT_SUPPORT)
                .to_string(),
            description: non_blank(item.description.as_deref())
                .map(clean_description)
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            duration: parse_duration(item.duration.as_deref()),
            remote_support: non_blank(item.remote_support.as_deref())
                .unwrap_or(DEFAULT_SUPPORT)
                .to_string(),
            test_type: vec![non_blank(item.category.as_deref())
                .unwrap_or(DEFAULT_TEST_TYPE)
                .to_string()],
        }
    }
}

/// Format up to `limit` items, keeping their order.
pub fn format_results(items: &[&CatalogItem], limit: usize) -> Vec<RecommendationResult> {
    items
        .iter()
        .take(limit)
        .map(|item| RecommendationResult::from_item(item))
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Whole minutes from a duration cell. Accepts integers and integral-valued
/// decimals such as `"30.0"`; everything else, including negatives, is 0.
pub fn parse_duration(raw: Option<&str>) -> u32 {
    let Some(raw) = non_blank(raw) else {
        return 0;
    };
    if let Ok(minutes) = raw.parse::<u32>() {
        return minutes;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Doubled phrases and the phrase each collapses to. Each pattern captures
/// the surviving (second) phrase so its original casing is kept.
static DESCRIPTION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        r"(?i)\bassessment\s+(assessment)\b",
        r"(?i)\btest\s+(test)\b",
        r"(?i)\bassessment\s+(test)\b",
        r"(?i)\btest\s+(assessment)\b",
        r"(?i)\bskills\s+and\s+abilities\s+(skills\s+and\s+abilities)\b",
    ]
    .into_iter()
    .map(|pattern| (Regex::new(pattern).expect("description rule is a valid regex"), "${1}"))
    .collect()
});

/// Collapse known doubled phrases and capitalize the first character.
///
/// Rules run in order and repeat until none fires; every substitution
/// shortens the text, so this terminates, and the result is a fixed point:
/// `clean_description(clean_description(x)) == clean_description(x)`.
pub fn clean_description(text: &str) -> String {
    let mut cleaned = text.trim().to_string();
    loop {
        let mut changed = false;
        for (pattern, replacement) in DESCRIPTION_RULES.iter() {
            let next = pattern.replace_all(&cleaned, *replacement).into_owned();
            if next != cleaned {
                cleaned = next;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    capitalize_first(&cleaned)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_each_doubled_phrase() {
        assert_eq!(clean_description("an assessment assessment"), "An assessment");
        assert_eq!(clean_description("a test test"), "A test");
        assert_eq!(clean_description("an assessment test"), "An test");
        assert_eq!(clean_description("a test assessment"), "A assessment");
        assert_eq!(
            clean_description("measures skills and abilities skills and abilities"),
            "Measures skills and abilities"
        );
    }

    #[test]
    fn collapsing_is_phrase_based_not_general_dedup() {
        assert_eq!(clean_description("very very fast"), "Very very fast");
        assert_eq!(clean_description("testing test"), "Testing test");
    }

    #[test]
    fn repeated_runs_collapse_fully() {
        assert_eq!(clean_description("test test test"), "Test");
        assert_eq!(clean_description("assessment test test"), "Test");
    }

    #[test]
    fn keeps_casing_of_surviving_phrase() {
        assert_eq!(clean_description("Numerical Test Test"), "Numerical Test");
    }

    #[test]
    fn clean_is_idempotent() {
        let samples = [
            "",
            "   ",
            "test test test assessment",
            "Assessment ASSESSMENT of skills and abilities skills and abilities",
            "ßtraße assessment test",
            "already clean.",
            "test\ttest\nassessment",
        ];
        for sample in samples {
            let once = clean_description(sample);
            assert_eq!(clean_description(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn full_row_formats_verbatim() {
        let mut item = CatalogItem::new("Verify", "Cognitive")
            .with_description("numerical reasoning test test")
            .with_url("https://example.com/verify")
            .with_duration("18");
        item.adaptive_support = Some("Yes".to_string());
        item.remote_support = Some("Yes".to_string());

        let result = RecommendationResult::from_item(&item);
        assert_eq!(
            result,
            RecommendationResult {
                url: "https://example.com/verify".to_string(),
                adaptive_support: "Yes".to_string(),
                description: "Numerical reasoning test".to_string(),
                duration: 18,
                remote_support: "Yes".to_string(),
                test_type: vec!["Cognitive".to_string()],
            }
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let result = RecommendationResult::from_item(&CatalogItem::default());
        assert_eq!(result.url, DEFAULT_URL);
        assert_eq!(result.adaptive_support, "No");
        assert_eq!(result.remote_support, "No");
        assert_eq!(result.description, NO_DESCRIPTION);
        assert_eq!(result.duration, 0);
        assert_eq!(result.test_type, vec!["Other".to_string()]);
    }

    #[test]
    fn blank_description_uses_default() {
        let item = CatalogItem::new("A", "B").with_description("   ");
        assert_eq!(RecommendationResult::from_item(&item).description, NO_DESCRIPTION);
    }

    #[test]
    fn duration_parsing_never_fails() {
        assert_eq!(parse_duration(Some("30")), 30);
        assert_eq!(parse_duration(Some(" 45 ")), 45);
        assert_eq!(parse_duration(Some("30.0")), 30);
        assert_eq!(parse_duration(Some("about 20")), 0);
        assert_eq!(parse_duration(Some("-5")), 0);
        assert_eq!(parse_duration(Some("NaN")), 0);
        assert_eq!(parse_duration(None), 0);
    }

    #[test]
    fn format_results_truncates_and_keeps_order() {
        let items: Vec<CatalogItem> = (0..15)
            .map(|i| CatalogItem::new(&format!("Item {i}"), &format!("Type {i}")))
            .collect();
        let refs: Vec<&CatalogItem> = items.iter().collect();
        let results = format_results(&refs, 10);
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].test_type, vec!["Type 0".to_string()]);
        assert_eq!(results[9].test_type, vec!["Type 9".to_string()]);
    }

    #[test]
    fn serializes_with_public_field_names() {
        let value = serde_json::to_value(RecommendationResult::from_item(&CatalogItem::default())).unwrap();
        for key in ["url", "adaptive_support", "description", "duration", "remote_support", "test_type"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
