//! `run` — execute a one-off prompt under a USD budget.
//!
//! The run pipeline: validate arguments, resolve the per-user virtual
//! key, convert the budget into a token ceiling, build and route a
//! context, execute through the adapter registry, then report usage and
//! write a Markdown dashboard.

use clap::Args;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

use promptbound_config::AppConfig;
use promptbound_context::{Context, ExecuteRequest, Executor, RouteRequest, Router};
use promptbound_core::error::{ConfigError, ContextError, Error, Result};
use promptbound_providers::build_from_config;
use promptbound_telemetry::{render_dashboard, write_dashboard, PricingTable};

use crate::hints::{parse_prompt_hints, PromptHints};

const PREVIEW_CHARS: usize = 500;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Natural language prompt describing the task
    #[arg(long)]
    pub prompt: String,

    /// Username for this run
    #[arg(long)]
    pub user: String,

    /// USD budget cap for this run
    #[arg(long)]
    pub budget: f64,

    /// Custom instructions
    #[arg(long)]
    pub instructions: Option<String>,

    /// Path to an instructions file
    #[arg(long)]
    pub instructions_file: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,
}

/// Validated configuration for one run.
#[derive(Debug)]
pub struct RunConfig {
    pub prompt: String,
    pub user: String,
    pub budget: f64,
    pub model: String,
    pub run_id: String,
    pub instructions: Option<String>,
    pub hints: PromptHints,
}

impl RunConfig {
    /// Validate arguments and derive the run configuration.
    ///
    /// A non-positive budget and conflicting instruction flags are
    /// rejected here, before anything else happens.
    pub fn from_args(args: &RunArgs, default_model: &str) -> Result<Self> {
        if args.budget <= 0.0 {
            return Err(ContextError::InvalidConstraint {
                name: "budget".into(),
                reason: "must be greater than 0".into(),
            }
            .into());
        }

        if args.instructions.is_some() && args.instructions_file.is_some() {
            return Err(ContextError::ConflictingOptions(
                "cannot specify both --instructions and --instructions-file".into(),
            )
            .into());
        }

        let instructions = match (&args.instructions, &args.instructions_file) {
            (Some(text), _) => Some(text.clone()),
            (None, Some(path)) => match std::fs::read_to_string(path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "instructions file unreadable, ignoring");
                    None
                }
            },
            (None, None) => None,
        };

        Ok(Self {
            prompt: args.prompt.clone(),
            user: args.user.clone(),
            budget: args.budget,
            model: args.model.clone().unwrap_or_else(|| default_model.into()),
            run_id: Uuid::new_v4().to_string(),
            instructions,
            hints: parse_prompt_hints(&args.prompt),
        })
    }

    /// Environment variable holding this user's virtual key.
    pub fn virtual_key_env(&self) -> String {
        format!("PROMPTBOUND_VIRTUAL_KEY_{}", self.user.to_uppercase())
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let mut config = AppConfig::load_or_default(&config_path())?;
    let run_config = RunConfig::from_args(&args, &config.default_model)?;

    println!("Run {} for {}", run_config.run_id, run_config.user);
    println!("Task type: {}", run_config.hints.task_type);

    // Per-user credential, resolved from the environment
    let key_env = run_config.virtual_key_env();
    let virtual_key = std::env::var(&key_env).map_err(|_| {
        Error::Config(ConfigError::Invalid(format!(
            "Virtual key not found. Please set {key_env} environment variable."
        )))
    })?;
    config.api_key = Some(virtual_key);

    // Convert the USD budget into a token ceiling
    let pricing = PricingTable::with_defaults();
    let max_tokens = pricing.budget_to_max_tokens(run_config.budget, &run_config.model);
    println!("Estimated max tokens: {max_tokens}");

    // Shape the context: intent from hints, ceiling from budget
    let mut context = Context::new(&run_config.hints.task_type)?.with_max_tokens(max_tokens);
    context
        .metadata
        .insert("user".into(), run_config.user.clone().into());
    context
        .metadata
        .insert("budget_usd".into(), run_config.budget.into());
    context
        .metadata
        .insert("run_id".into(), run_config.run_id.clone().into());
    context.route(&Router::default(), &RouteRequest::model(&run_config.model));

    // Execute through the configured adapters
    let executor = Executor::new(build_from_config(&config));
    let mut request = ExecuteRequest::new(&run_config.prompt);
    if let Some(instructions) = &run_config.instructions {
        request = request.with_instructions(instructions);
    }

    let envelope = context.execute(&executor, request).await?;

    println!("✓ LLM call successful ({} ms)", envelope.duration_ms);
    if let Some(usage) = &envelope.usage {
        let cost = pricing.usage_cost(usage, &envelope.model_used);
        println!("  Tokens used: {}", usage.total_tokens);
        println!("  Cost: ${cost:.6}");
    }

    // Write the run dashboard
    let markdown = render_dashboard(
        &run_config.prompt,
        &envelope.result,
        &run_config.hints.task_type,
    );
    let path = write_dashboard(
        Path::new(&config.dashboard.output_dir),
        &run_config.run_id,
        &markdown,
    )
    .map_err(|e| Error::Internal(format!("failed to write dashboard: {e}")))?;
    println!("✓ Dashboard generated: {}", path.display());

    // Preview
    println!("\nResponse preview:");
    println!("{}", "-".repeat(60));
    let mut preview: String = envelope.result.chars().take(PREVIEW_CHARS).collect();
    if envelope.result.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    println!("{preview}");
    println!("{}", "-".repeat(60));

    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var("PROMPTBOUND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".promptbound/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args() -> RunArgs {
        RunArgs {
            prompt: "build me a custom weekend planning tool".into(),
            user: "matthew".into(),
            budget: 0.05,
            instructions: None,
            instructions_file: None,
            model: None,
        }
    }

    #[test]
    fn valid_args_derive_config() {
        let config = RunConfig::from_args(&base_args(), "gpt-4o-mini").unwrap();
        assert_eq!(config.user, "matthew");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.hints.task_type, "planner");
        assert!(!config.run_id.is_empty());
        assert!(config.instructions.is_none());
    }

    #[test]
    fn zero_budget_rejected() {
        let args = RunArgs {
            budget: 0.0,
            ..base_args()
        };
        let err = RunConfig::from_args(&args, "gpt-4o-mini").unwrap_err();
        assert!(matches!(
            err,
            Error::Context(ContextError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn conflicting_instruction_flags_rejected() {
        let args = RunArgs {
            instructions: Some("inline".into()),
            instructions_file: Some(PathBuf::from("/tmp/instructions.txt")),
            ..base_args()
        };
        let err = RunConfig::from_args(&args, "gpt-4o-mini").unwrap_err();
        assert!(matches!(
            err,
            Error::Context(ContextError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn instructions_resolved_from_flag() {
        let args = RunArgs {
            instructions: Some("custom instructions".into()),
            ..base_args()
        };
        let config = RunConfig::from_args(&args, "gpt-4o-mini").unwrap();
        assert_eq!(config.instructions.as_deref(), Some("custom instructions"));
    }

    #[test]
    fn instructions_resolved_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "file instructions").unwrap();

        let args = RunArgs {
            instructions_file: Some(file.path().to_path_buf()),
            ..base_args()
        };
        let config = RunConfig::from_args(&args, "gpt-4o-mini").unwrap();
        assert_eq!(config.instructions.as_deref(), Some("file instructions"));
    }

    #[test]
    fn unreadable_instructions_file_ignored() {
        let args = RunArgs {
            instructions_file: Some(PathBuf::from("/nonexistent/instructions.txt")),
            ..base_args()
        };
        let config = RunConfig::from_args(&args, "gpt-4o-mini").unwrap();
        assert!(config.instructions.is_none());
    }

    #[test]
    fn explicit_model_beats_default() {
        let args = RunArgs {
            model: Some("gpt-4o".into()),
            ..base_args()
        };
        let config = RunConfig::from_args(&args, "gpt-4o-mini").unwrap();
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn virtual_key_env_uppercases_user() {
        let config = RunConfig::from_args(&base_args(), "gpt-4o-mini").unwrap();
        assert_eq!(config.virtual_key_env(), "PROMPTBOUND_VIRTUAL_KEY_MATTHEW");
    }
}
