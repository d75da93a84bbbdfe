//! `inspect` — summarize a serialized context file.

use std::path::Path;

use serde_json::Value;

use promptbound_context::Context;
use promptbound_core::error::{Error, Result};

pub fn run(file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| Error::Internal(format!("failed to read {}: {e}", file.display())))?;
    let context = Context::from_json(&raw)?;

    println!("{context}");
    println!("  created: {}", context.created_at.to_rfc3339());
    if let Some(category) = &context.category {
        println!("  category: {category}");
    }
    if let Some(parent_id) = &context.parent_id {
        println!("  parent: {parent_id}");
    }

    for key in ["model", "provider", "strategy"] {
        if let Some(value) = context.routing.get(key).and_then(Value::as_str) {
            println!("  {key}: {value}");
        }
    }
    if let Some(max_tokens) = context.max_tokens_constraint() {
        println!("  max_tokens: {max_tokens}");
    }

    for (index, input) in context.inputs.iter().enumerate() {
        let kind = if input.is_text() { "text" } else { "structured" };
        println!(
            "  input[{index}]: {kind}, relevance={}, tokens={}",
            input.relevance, input.tokens
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn inspects_a_round_tripped_context() {
        let mut context = Context::new("analyze").unwrap().with_max_tokens(1000);
        context.add_input("Some data", 0.9, None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", context.to_json().unwrap()).unwrap();

        assert!(run(file.path()).is_ok());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not a context").unwrap();

        assert!(run(file.path()).is_err());
    }
}
