//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token, rounded
//! down. This approximation is accurate within ~10% for BPE tokenizers
//! (GPT-3.5, GPT-4, Claude) on English text. The rounding direction and
//! ratio are load-bearing: downstream pruning decisions depend on them,
//! so they must not be "improved".

use serde_json::Value;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds down.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() / 4) as u32
}

/// Estimate the token count for an opaque content value.
///
/// Strings are measured directly; any other value is measured over its
/// JSON serialization.
pub fn estimate_value_tokens(value: &Value) -> u32 {
    match value {
        Value::String(s) => estimate_tokens(s),
        other => estimate_tokens(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn four_chars_is_one_token() {
        assert_eq!(estimate_tokens("test"), 1);
    }

    #[test]
    fn seven_chars_rounds_down() {
        assert_eq!(estimate_tokens("seven c"), 1);
    }

    #[test]
    fn two_hundred_chars() {
        let text = "a".repeat(200);
        assert_eq!(estimate_tokens(&text), 50);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 4 three-byte characters are still one token
        assert_eq!(estimate_tokens("日本語字"), 1);
    }

    #[test]
    fn string_value_measured_directly() {
        assert_eq!(estimate_value_tokens(&json!("test")), 1);
    }

    #[test]
    fn structured_value_measured_as_json() {
        // {"k":"vvvv"} serializes to 12 chars → 3 tokens
        assert_eq!(estimate_value_tokens(&json!({"k": "vvvv"})), 3);
    }

    #[test]
    fn number_value_measured_as_rendered() {
        // "1234" → 1 token
        assert_eq!(estimate_value_tokens(&json!(1234)), 1);
    }
}
