//! The configured category set and difficulty roster. Both the prompt
//! builders and candidate validation read from here, so the model is asked
//! for exactly the categories the validator will accept.

use crate::models::topic::Difficulty;

/// Interview categories: slug (what the model must echo back) plus the focus
/// line shown in the system prompt.
pub const CATEGORIES: &[(&str, &str)] = &[
    (
        "technical_coding",
        "Coding challenges, algorithms, data structures",
    ),
    (
        "system_design",
        "Architecture decisions, scalability, distributed systems",
    ),
    (
        "behavioral",
        "Leadership, teamwork, problem-solving approaches",
    ),
    (
        "technology_deep_dive",
        "Specific technology expertise and experience",
    ),
    (
        "architecture_decisions",
        "Technical trade-offs, design patterns, best practices",
    ),
    (
        "debugging_troubleshooting",
        "Problem diagnosis, error handling, performance issues",
    ),
    (
        "testing_quality",
        "Testing strategies, QA processes, code quality",
    ),
    (
        "devops_deployment",
        "CI/CD, infrastructure, monitoring, deployment strategies",
    ),
];

/// True if `slug` names a configured category.
pub fn is_known_category(slug: &str) -> bool {
    CATEGORIES.iter().any(|(name, _)| *name == slug)
}

/// `- slug: focus` lines for the system prompt.
pub fn category_lines() -> String {
    CATEGORIES
        .iter()
        .map(|(slug, focus)| format!("- {slug}: {focus}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- keyword: experience band` lines for the system prompt.
pub fn difficulty_lines() -> String {
    Difficulty::ALL
        .iter()
        .map(|level| format!("- {}: {}", level.as_str(), level.describe()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_accepted() {
        assert!(is_known_category("system_design"));
        assert!(is_known_category("behavioral"));
        assert!(is_known_category("devops_deployment"));
    }

    #[test]
    fn test_unknown_categories_rejected() {
        assert!(!is_known_category("quantum_computing"));
        assert!(!is_known_category("System_Design"));
        assert!(!is_known_category(""));
    }

    #[test]
    fn test_category_lines_cover_all_eight() {
        let lines = category_lines();
        assert_eq!(lines.lines().count(), CATEGORIES.len());
        assert!(lines.contains("- technical_coding: Coding challenges"));
    }

    #[test]
    fn test_difficulty_lines_cover_all_four_levels() {
        let lines = difficulty_lines();
        assert_eq!(lines.lines().count(), 4);
        assert!(lines.contains("- mid-level: Experienced developer"));
        assert!(lines.contains("- staff: Staff/Principal engineer"));
    }
}
