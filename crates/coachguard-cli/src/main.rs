//! CoachGuard CLI - run the prompt filter from the command line

use anyhow::Context;
use clap::Parser;
use coachguard_context::{Provider, SafetyLevel};
use coachguard_core::{CoachGuard, FilteringConfig};

#[derive(Parser)]
#[command(name = "coachguard")]
#[command(about = "CoachGuard - Trust-adaptive prompt filtering for coaching assistants")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Filter a single prompt and print the decision
    Check {
        /// The prompt to filter
        prompt: String,
        /// Target provider (openai, claude, gemini, grok, local)
        #[arg(short, long, default_value = "claude")]
        provider: String,
        /// Safety level (low, medium, high, maximum)
        #[arg(short, long, default_value = "medium")]
        safety_level: String,
        /// Personality type tag to weave into the prompt
        #[arg(long)]
        personality_type: Option<String>,
        /// Application context tag (e.g. coaching)
        #[arg(long)]
        context: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Check {
            prompt,
            provider,
            safety_level,
            personality_type,
            context,
            json,
        }) => {
            let safety_level: SafetyLevel = serde_json::from_value(
                serde_json::Value::String(safety_level.to_lowercase()),
            )
            .context("invalid safety level (expected low, medium, high, or maximum)")?;

            let mut config =
                FilteringConfig::for_provider(Provider::from_tag(&provider), safety_level);
            config.personality_type = personality_type;
            config.context = context;

            let guard = CoachGuard::in_memory();
            let result = guard.filter_prompt(&prompt, &config).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "decision:   {}",
                    if result.allowed { "allowed" } else { "refused" }
                );
                println!("risk score: {:.2}", result.safety_score);
                if let Some(refusal) = result.refusal.as_ref().filter(|r| r.should_refuse) {
                    if let Some(reason) = refusal.reason {
                        println!("reason:     {}", reason);
                    }
                    println!("message:    {}", refusal.message);
                    if let Some(suggestion) = &refusal.alternative_suggestion {
                        println!("suggestion: {}", suggestion);
                    }
                }
                for warning in &result.warnings {
                    println!("warning:    {}", warning);
                }
                if let Some(entry) = result.audit_log_id.and_then(|id| guard.audit_entry(id)) {
                    println!("audit:      {} ({})", entry.id, entry.action);
                }
                if result.allowed {
                    println!("\n{}", result.filtered_prompt);
                }
            }
        }
        None => {
            println!("CoachGuard v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}
