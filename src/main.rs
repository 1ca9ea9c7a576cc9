//! # Due-Diligence Agent
//!
//! Command-line runner for the iterative due-diligence research loop.
//!
//! ## Quick Start
//! ```bash
//! cargo run -- --target "Jane Doe" --context "Fintech founder" --depth 2
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use diligence_agent::{Config, ModelSet, ResearchRequest, ResearchSummary, ResearchWorkflow};

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
#[derive(Parser, Debug)]
#[command(
    name = "diligence-agent",
    version,
    about = "Iterative due-diligence research on a person or organization",
    long_about = r#"
Due-Diligence Agent

Researches a target over several search iterations. Each iteration:
  1. Generates targeted search queries
  2. Runs them against Perplexity
  3. Extracts people, organizations and events
  4. Scores six risk categories
Finally it writes a markdown risk assessment report.

REQUIRED ENVIRONMENT:
  OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY, PERPLEXITY_API_KEY

EXAMPLES:
  diligence-agent --target "Jane Doe" --context "CEO of Acme Payments"
  diligence-agent --target "Acme Holdings" --focus legal --depth 1 --json
"#
)]
struct Args {
    /// Person or organization to investigate
    #[arg(short = 't', long = "target", value_name = "NAME")]
    target: String,

    /// Free-text background on the target
    #[arg(short = 'c', long = "context", default_value = "")]
    context: String,

    /// Area to emphasize, e.g. "legal" or "financial"
    #[arg(long = "focus", default_value = "")]
    focus: String,

    #[arg(long = "time-period", default_value = "")]
    time_period: String,

    #[arg(long = "industry", default_value = "")]
    industry: String,

    #[arg(long = "location", default_value = "")]
    location: String,

    /// Search iterations (overrides MAX_SEARCH_DEPTH)
    #[arg(short = 'd', long = "depth")]
    depth: Option<usize>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose", default_value = "false")]
    verbose: bool,

    /// Print the full research state as JSON instead of the report
    #[arg(long = "json", default_value = "false")]
    json: bool,
}

impl Args {
    fn request(&self, default_depth: usize) -> ResearchRequest {
        ResearchRequest::new(self.target.clone())
            .with_context(self.context.clone())
            .with_focus(self.focus.clone())
            .with_time_period(self.time_period.clone())
            .with_industry(self.industry.clone())
            .with_location(self.location.clone())
            .with_max_depth(self.depth.unwrap_or(default_depth))
    }
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?;
    init_logging(config.log_filter(args.verbose))?;
    config.validate()?;
    config.require_credentials()?;

    info!(
        query_model = %config.query_model,
        extraction_model = %config.extraction_model,
        analysis_model = %config.analysis_model,
        search_model = %config.perplexity_model,
        "Configuration loaded"
    );

    let models = ModelSet::from_env(
        &config.query_model,
        &config.extraction_model,
        &config.analysis_model,
    )
    .context("Failed to initialize model clients")?;
    let search = config.search_provider()?;

    let workflow = ResearchWorkflow::with_settings(models, search, config.workflow_settings());
    let request = args.request(config.max_search_depth);

    let state = workflow.run(request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("\n{}\n", ResearchSummary::from_state(&state));
    if state.has_report() {
        println!("{}", state.final_report);
    } else {
        eprintln!("Research did not complete; no report was produced.");
    }

    Ok(())
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
fn init_logging(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
