//! Command-line interface for the analysis pipeline.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::analyzer::Analyzer;
use crate::client::AnthropicClient;
use crate::config::AnalysisConfig;
use crate::decoder::decode_reply;
use crate::error::{AnalysisError, Result};
use crate::prompt::build_analysis_prompt;
use crate::summary::render_text;
use crate::types::{AnalysisRequest, AnalysisResult};

/// RubricScore - Rubric-based document analysis through a language model.
#[derive(Parser)]
#[command(name = "rubricscore-analyze")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a document against a rubric using the configured model.
    Analyze {
        /// File containing the evaluation rubric
        #[arg(short, long)]
        rubric: PathBuf,

        /// File containing the document text
        #[arg(short, long)]
        document: PathBuf,

        /// Provider id (default: LLM_PROVIDER)
        #[arg(short, long)]
        provider: Option<String>,

        /// Language tag (default: ANALYSIS_LANGUAGE)
        #[arg(short, long)]
        lang: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print the prompt that would be sent to the model.
    Prompt {
        #[arg(short, long)]
        rubric: PathBuf,

        #[arg(short, long)]
        document: PathBuf,
    },

    /// Decode a saved raw model reply.
    Decode {
        /// File containing the raw reply
        reply: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            rubric,
            document,
            provider,
            lang,
            format,
        } => analyze_command(&rubric, &document, provider, lang, format).await,
        Commands::Prompt { rubric, document } => {
            let rubric = read_input(&rubric).await?;
            let document = read_input(&document).await?;
            println!("{}", build_analysis_prompt(&rubric, &document));
            Ok(())
        }
        Commands::Decode { reply, format } => {
            let reply = read_input(&reply).await?;
            let result = decode_reply(&reply)?;
            print_result(&result, format)
        }
    }
}

async fn analyze_command(
    rubric: &Path,
    document: &Path,
    provider: Option<String>,
    lang: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let config = AnalysisConfig::from_env()?;
    let request = AnalysisRequest::new(
        read_input(rubric).await?,
        read_input(document).await?,
        provider.unwrap_or_else(|| config.provider.clone()),
        lang.unwrap_or_else(|| config.language.clone()),
    );

    let client =
        AnthropicClient::new(&config).map_err(|e| AnalysisError::Config(e.to_string()))?;
    let report = Analyzer::new(&client).analyze_detailed(&request).await?;

    eprintln!(
        "{} {} ({} input / {} output tokens)",
        style("Analyzed with").bold(),
        style(&report.metadata.model).cyan(),
        report.metadata.input_tokens,
        report.metadata.output_tokens
    );
    for violation in &report.violations {
        eprintln!("{} {violation}", style("warning:").yellow().bold());
    }

    print_result(&report.result, format)
}

fn print_result(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", render_text(result)),
    }
    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        AnalysisError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read {}: {e}", path.display()),
        ))
    })
}
