//! Candidate validation. Every raw object the model emits either becomes a
//! `TopicRecord` or is rejected with a reason; the generator logs and counts
//! rejections, and the run continues as long as one candidate survives.

use serde_json::Value;
use thiserror::Error;

use crate::generation::catalog::is_known_category;
use crate::models::topic::{Difficulty, TopicRecord};

/// Titles shorter than this are not descriptive enough to run a discussion from.
const MIN_TITLE_LEN: usize = 10;
/// Keep at most this many key discussion points per topic.
const MAX_KEY_POINTS: usize = 5;
/// Keep at most this many technologies per topic.
const MAX_TECHNOLOGIES: usize = 6;
/// Plausible discussion window in minutes. Positive values outside it fall
/// back to the default rather than sinking the candidate.
const MIN_DURATION_MINUTES: u32 = 15;
const MAX_DURATION_MINUTES: u32 = 120;
const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Why a candidate was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("candidate is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' has the wrong type")]
    WrongType(&'static str),

    #[error("title is shorter than {MIN_TITLE_LEN} characters")]
    TitleTooShort,

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("description is empty")]
    EmptyDescription,

    #[error("keyPoints is empty")]
    EmptyKeyPoints,

    #[error("durationMinutes {0} is not positive")]
    NonPositiveDuration(i64),
}

/// Validates one candidate object against the `TopicRecord` schema.
pub fn validate_candidate(raw: &Value) -> Result<TopicRecord, RejectReason> {
    let obj = raw.as_object().ok_or(RejectReason::NotAnObject)?;

    let title = require_str(raw, "title")?.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(RejectReason::TitleTooShort);
    }

    let category = require_str(raw, "category")?.trim();
    if !is_known_category(category) {
        return Err(RejectReason::UnknownCategory(category.to_string()));
    }

    let difficulty_raw = require_str(raw, "difficulty")?.trim();
    let difficulty = Difficulty::from_keyword(difficulty_raw)
        .ok_or_else(|| RejectReason::UnknownDifficulty(difficulty_raw.to_string()))?;

    let description = require_str(raw, "description")?.trim();
    if description.is_empty() {
        return Err(RejectReason::EmptyDescription);
    }

    let key_points = match obj.get("keyPoints") {
        None => return Err(RejectReason::MissingField("keyPoints")),
        Some(Value::Array(points)) => collect_strings(points, MAX_KEY_POINTS),
        Some(_) => return Err(RejectReason::WrongType("keyPoints")),
    };
    if key_points.is_empty() {
        return Err(RejectReason::EmptyKeyPoints);
    }

    let duration_minutes = validate_duration(obj.get("durationMinutes"))?;

    // Optional: absent or wrong-typed technologies degrade to an empty set.
    let mut technologies = match obj.get("technologies") {
        Some(Value::Array(techs)) => collect_strings(techs, MAX_TECHNOLOGIES),
        _ => Vec::new(),
    };
    dedup_preserving_order(&mut technologies);

    Ok(TopicRecord {
        title: title.to_string(),
        category: category.to_string(),
        difficulty,
        description: description.to_string(),
        key_points,
        duration_minutes,
        technologies,
    })
}

fn require_str<'a>(raw: &'a Value, field: &'static str) -> Result<&'a str, RejectReason> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(RejectReason::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(RejectReason::WrongType(field)),
    }
}

/// Collects up to `max` trimmed, non-empty strings. Non-string scalars are
/// stringified the way the reporting side would render them.
fn collect_strings(values: &[Value], max: usize) -> Vec<String> {
    let mut out = Vec::new();
    for value in values {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        if text.is_empty() {
            continue;
        }
        out.push(text);
        if out.len() == max {
            break;
        }
    }
    out
}

fn validate_duration(value: Option<&Value>) -> Result<u32, RejectReason> {
    let number = match value {
        None | Some(Value::Null) => return Err(RejectReason::MissingField("durationMinutes")),
        Some(Value::Number(n)) => n,
        Some(_) => return Err(RejectReason::WrongType("durationMinutes")),
    };

    // Fractional durations are truncated to whole minutes.
    let minutes = number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f as i64))
        .ok_or(RejectReason::WrongType("durationMinutes"))?;

    if minutes <= 0 {
        return Err(RejectReason::NonPositiveDuration(minutes));
    }

    let minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
    if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Ok(DEFAULT_DURATION_MINUTES)
    }
}

/// Technologies form a set: later duplicates are dropped, first occurrence
/// keeps its position.
fn dedup_preserving_order(values: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.contains(v) {
            false
        } else {
            seen.push(v.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Value {
        json!({
            "title": "Database Performance Optimization",
            "category": "technical_coding",
            "difficulty": "senior",
            "description": "Analyze and optimize slow-performing queries in a high-traffic application database.",
            "keyPoints": ["Index optimization", "Query analysis", "Caching strategies"],
            "durationMinutes": 40,
            "technologies": ["PostgreSQL", "Redis"]
        })
    }

    #[test]
    fn test_well_formed_candidate_passes() {
        let record = validate_candidate(&candidate()).unwrap();
        assert_eq!(record.title, "Database Performance Optimization");
        assert_eq!(record.category, "technical_coding");
        assert_eq!(record.difficulty, Difficulty::Senior);
        assert_eq!(record.key_points.len(), 3);
        assert_eq!(record.duration_minutes, 40);
        assert_eq!(record.technologies, vec!["PostgreSQL", "Redis"]);
    }

    #[test]
    fn test_non_object_candidate_rejected() {
        assert_eq!(
            validate_candidate(&json!("just a string")),
            Err(RejectReason::NotAnObject)
        );
        assert_eq!(validate_candidate(&json!(42)), Err(RejectReason::NotAnObject));
    }

    #[test]
    fn test_missing_title_rejected() {
        let mut c = candidate();
        c.as_object_mut().unwrap().remove("title");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::MissingField("title"))
        );
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let mut c = candidate();
        c["difficulty"] = Value::Null;
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::MissingField("difficulty"))
        );
    }

    #[test]
    fn test_numeric_title_is_wrong_type() {
        let mut c = candidate();
        c["title"] = json!(12345);
        assert_eq!(validate_candidate(&c), Err(RejectReason::WrongType("title")));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut c = candidate();
        c["title"] = json!("");
        assert_eq!(validate_candidate(&c), Err(RejectReason::TitleTooShort));
    }

    #[test]
    fn test_short_title_rejected() {
        let mut c = candidate();
        c["title"] = json!("Too short");
        assert_eq!(validate_candidate(&c), Err(RejectReason::TitleTooShort));
    }

    #[test]
    fn test_title_is_trimmed() {
        let mut c = candidate();
        c["title"] = json!("  Database Performance Optimization  ");
        let record = validate_candidate(&c).unwrap();
        assert_eq!(record.title, "Database Performance Optimization");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut c = candidate();
        c["category"] = json!("underwater_basket_weaving");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::UnknownCategory(
                "underwater_basket_weaving".to_string()
            ))
        );
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        let mut c = candidate();
        c["difficulty"] = json!("wizard");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::UnknownDifficulty("wizard".to_string()))
        );
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut c = candidate();
        c["description"] = json!("   ");
        assert_eq!(validate_candidate(&c), Err(RejectReason::EmptyDescription));
    }

    #[test]
    fn test_missing_key_points_rejected() {
        let mut c = candidate();
        c.as_object_mut().unwrap().remove("keyPoints");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::MissingField("keyPoints"))
        );
    }

    #[test]
    fn test_empty_key_points_rejected() {
        let mut c = candidate();
        c["keyPoints"] = json!([]);
        assert_eq!(validate_candidate(&c), Err(RejectReason::EmptyKeyPoints));
    }

    #[test]
    fn test_key_points_of_blank_strings_rejected() {
        let mut c = candidate();
        c["keyPoints"] = json!(["", "   "]);
        assert_eq!(validate_candidate(&c), Err(RejectReason::EmptyKeyPoints));
    }

    #[test]
    fn test_key_points_wrong_type_rejected() {
        let mut c = candidate();
        c["keyPoints"] = json!("not a list");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::WrongType("keyPoints"))
        );
    }

    #[test]
    fn test_key_points_truncated_to_five() {
        let mut c = candidate();
        c["keyPoints"] = json!(["a1", "b2", "c3", "d4", "e5", "f6", "g7"]);
        let record = validate_candidate(&c).unwrap();
        assert_eq!(record.key_points, vec!["a1", "b2", "c3", "d4", "e5"]);
    }

    #[test]
    fn test_missing_duration_rejected() {
        let mut c = candidate();
        c.as_object_mut().unwrap().remove("durationMinutes");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::MissingField("durationMinutes"))
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut c = candidate();
        c["durationMinutes"] = json!(0);
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::NonPositiveDuration(0))
        );
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut c = candidate();
        c["durationMinutes"] = json!(-30);
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::NonPositiveDuration(-30))
        );
    }

    #[test]
    fn test_string_duration_is_wrong_type() {
        let mut c = candidate();
        c["durationMinutes"] = json!("45 minutes");
        assert_eq!(
            validate_candidate(&c),
            Err(RejectReason::WrongType("durationMinutes"))
        );
    }

    #[test]
    fn test_positive_but_tiny_duration_falls_back_to_default() {
        let mut c = candidate();
        c["durationMinutes"] = json!(5);
        assert_eq!(validate_candidate(&c).unwrap().duration_minutes, 30);
    }

    #[test]
    fn test_oversized_duration_falls_back_to_default() {
        let mut c = candidate();
        c["durationMinutes"] = json!(480);
        assert_eq!(validate_candidate(&c).unwrap().duration_minutes, 30);
    }

    #[test]
    fn test_fractional_duration_truncates() {
        let mut c = candidate();
        c["durationMinutes"] = json!(45.8);
        assert_eq!(validate_candidate(&c).unwrap().duration_minutes, 45);
    }

    #[test]
    fn test_missing_technologies_defaults_to_empty() {
        let mut c = candidate();
        c.as_object_mut().unwrap().remove("technologies");
        assert!(validate_candidate(&c).unwrap().technologies.is_empty());
    }

    #[test]
    fn test_wrong_type_technologies_defaults_to_empty() {
        let mut c = candidate();
        c["technologies"] = json!("Rust, Tokio");
        assert!(validate_candidate(&c).unwrap().technologies.is_empty());
    }

    #[test]
    fn test_technologies_truncated_to_six() {
        let mut c = candidate();
        c["technologies"] = json!(["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"]);
        assert_eq!(validate_candidate(&c).unwrap().technologies.len(), 6);
    }

    #[test]
    fn test_technologies_deduplicated_preserving_order() {
        let mut c = candidate();
        c["technologies"] = json!(["Redis", "PostgreSQL", "Redis", "Kafka"]);
        assert_eq!(
            validate_candidate(&c).unwrap().technologies,
            vec!["Redis", "PostgreSQL", "Kafka"]
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut c = candidate();
        c["confidence"] = json!(0.95);
        assert!(validate_candidate(&c).is_ok());
    }
}
