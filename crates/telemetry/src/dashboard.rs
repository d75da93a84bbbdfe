//! Markdown run dashboards.
//!
//! One file per run, written under the configured output directory.
//! Planner runs get a dedicated layout; everything else uses the generic
//! layout.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Render a Markdown dashboard for a completed run.
pub fn render_dashboard(prompt: &str, response: &str, task_type: &str) -> String {
    if task_type == "planner" {
        format!(
            "# Weekend Planning Tool\n\
             \n\
             ## Request\n\
             {prompt}\n\
             \n\
             ## Activities\n\
             {response}\n\
             \n\
             ## Notes\n\
             - Generated by promptbound copilot\n\
             - Budget estimate based on LLM usage\n"
        )
    } else {
        format!(
            "# Task: {}\n\
             \n\
             ## Request\n\
             {prompt}\n\
             \n\
             ## Response\n\
             {response}\n\
             \n\
             ## Metadata\n\
             - Task Type: {task_type}\n\
             - Generated by promptbound copilot\n",
            capitalize(task_type)
        )
    }
}

/// Write a rendered dashboard to `{dir}/{run_id}.md`, creating parent
/// directories as needed.
pub fn write_dashboard(dir: &Path, run_id: &str, markdown: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{run_id}.md"));
    std::fs::write(&path, markdown)?;
    debug!(path = %path.display(), "dashboard written");
    Ok(path)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_layout() {
        let md = render_dashboard("plan my weekend", "Saturday: hike", "planner");
        assert!(md.starts_with("# Weekend Planning Tool"));
        assert!(md.contains("## Activities"));
        assert!(md.contains("Saturday: hike"));
    }

    #[test]
    fn generic_layout_capitalizes_task_type() {
        let md = render_dashboard("analyze this", "Looks fine.", "analysis");
        assert!(md.starts_with("# Task: Analysis"));
        assert!(md.contains("## Response"));
        assert!(md.contains("- Task Type: analysis"));
    }

    #[test]
    fn writes_file_under_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b");

        let path = write_dashboard(&dir, "run-123", "# Hello").unwrap();
        assert!(path.ends_with("run-123.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hello");
    }
}
