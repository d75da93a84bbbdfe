//! Prompt hint parsing — coarse task-type detection.
//!
//! Simple word-boundary patterns classify a natural-language prompt into
//! a task type. The first matching category wins; prompts matching
//! nothing are "general".

use regex::Regex;
use std::sync::OnceLock;

/// Hints extracted from a natural-language prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptHints {
    pub task_type: String,
    pub keywords: Vec<String>,
}

fn categories() -> &'static [(Regex, &'static str, &'static str)] {
    static CATEGORIES: OnceLock<Vec<(Regex, &'static str, &'static str)>> = OnceLock::new();
    CATEGORIES.get_or_init(|| {
        vec![
            (
                Regex::new(r"\b(plan|planner|planning|schedule|agenda)\b").unwrap(),
                "planner",
                "planning",
            ),
            (
                Regex::new(r"\b(analyz[e]?|analysis|examine|inspect|investigate)\b").unwrap(),
                "analysis",
                "analysis",
            ),
            (
                Regex::new(r"\b(build|create|generate|make|develop)\b").unwrap(),
                "generation",
                "generation",
            ),
            (
                Regex::new(r"\b(summariz[e]?|summary|brief|overview)\b").unwrap(),
                "summarization",
                "summarization",
            ),
        ]
    })
}

/// Extract task hints from a prompt.
pub fn parse_prompt_hints(prompt: &str) -> PromptHints {
    let prompt_lower = prompt.to_lowercase();

    for (pattern, task_type, keyword) in categories() {
        if pattern.is_match(&prompt_lower) {
            return PromptHints {
                task_type: (*task_type).into(),
                keywords: vec![(*keyword).into()],
            };
        }
    }

    PromptHints {
        task_type: "general".into(),
        keywords: Vec::new(),
    }
}
