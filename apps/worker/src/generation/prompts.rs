//! Prompt constants and builders for topic generation. The response schema
//! block lists exactly the `TopicRecord` field set; the validator rejects
//! anything that strays from it, so keep the two in sync.

use crate::config::{DifficultyFocus, RunConfig};
use crate::generation::catalog::{category_lines, difficulty_lines};

/// System prompt template. Replace `{categories}` and `{difficulties}`
/// before sending.
const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an expert software engineering interview designer with 15+ years of experience at top tech companies (Google, Meta, Apple, Amazon, Microsoft).

Your task is to generate high-quality, realistic interview discussion topics that test both technical depth and practical experience.

AVAILABLE CATEGORIES:
{categories}

DIFFICULTY LEVELS:
{difficulties}

REQUIREMENTS:
1. Create diverse, realistic scenarios that senior engineers actually encounter
2. Focus on discussion-based topics rather than pure coding exercises
3. Include context and background for each topic
4. Ensure topics test both technical knowledge and practical experience
5. Return ONLY a JSON array of topic objects

RESPONSE FORMAT:
Return exactly this JSON structure with NO additional text:

[
  {
    "title": "Specific, engaging topic title",
    "category": "one of the available categories above",
    "difficulty": "one of: junior, mid-level, senior, staff",
    "description": "Detailed scenario or question (2-3 sentences)",
    "keyPoints": ["point1", "point2", "point3"],
    "durationMinutes": 30,
    "technologies": ["tech1", "tech2", "tech3"]
  }
]

Focus on creating realistic, practical scenarios that experienced engineers face in their daily work."#;

/// User prompt template. Replace `{num_topics}` and `{focus_requirement}`
/// (the latter is empty for a mixed-difficulty run).
const USER_PROMPT_TEMPLATE: &str = r#"Generate {num_topics} software engineering interview discussion topics.

REQUIREMENTS:
{focus_requirement}- Mix different categories evenly
- Include modern technologies and practices
- Focus on real-world scenarios
- Ensure topics are discussion-heavy rather than coding-heavy
- Duration should be 20-60 minutes per topic
- Include 3-5 key discussion points per topic
- List 2-4 relevant technologies per topic

Generate exactly {num_topics} topics and return only the JSON array."#;

/// Builds the system prompt from the configured catalog.
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{categories}", &category_lines())
        .replace("{difficulties}", &difficulty_lines())
}

/// Builds the user prompt for one run. A non-mixed focus adds the 80%
/// steering line; a mixed run states no preference.
pub fn build_user_prompt(run: &RunConfig) -> String {
    let focus_requirement = match run.difficulty_focus {
        DifficultyFocus::Mixed => String::new(),
        DifficultyFocus::Level(level) => {
            format!("- Focus primarily on {level} level topics (80% of topics).\n")
        }
    };

    USER_PROMPT_TEMPLATE
        .replace("{num_topics}", &run.num_topics.to_string())
        .replace("{focus_requirement}", &focus_requirement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::topic::Difficulty;

    fn run_with(num_topics: u32, focus: DifficultyFocus) -> RunConfig {
        RunConfig {
            num_topics,
            difficulty_focus: focus,
            model_name: "gemini-2.5-flash".to_string(),
        }
    }

    #[test]
    fn test_system_prompt_lists_catalog_and_schema() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("- system_design: Architecture decisions"));
        assert!(prompt.contains("- staff: Staff/Principal engineer"));
        assert!(prompt.contains(r#""keyPoints""#));
        assert!(prompt.contains(r#""durationMinutes""#));
        assert!(prompt.contains("Return ONLY a JSON array"));
        assert!(!prompt.contains("{categories}"));
        assert!(!prompt.contains("{difficulties}"));
    }

    #[test]
    fn test_user_prompt_states_requested_count() {
        let prompt = build_user_prompt(&run_with(7, DifficultyFocus::Mixed));
        assert!(prompt.contains("Generate 7 software engineering interview discussion topics."));
        assert!(prompt.contains("Generate exactly 7 topics"));
        assert!(!prompt.contains("{num_topics}"));
    }

    #[test]
    fn test_mixed_focus_omits_steering_line() {
        let prompt = build_user_prompt(&run_with(15, DifficultyFocus::Mixed));
        assert!(!prompt.contains("Focus primarily"));
        assert!(prompt.contains("REQUIREMENTS:\n- Mix different categories evenly"));
    }

    #[test]
    fn test_level_focus_adds_steering_line() {
        let prompt = build_user_prompt(&run_with(
            15,
            DifficultyFocus::Level(Difficulty::Senior),
        ));
        assert!(prompt.contains("- Focus primarily on senior level topics (80% of topics)."));
    }
}
