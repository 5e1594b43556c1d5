//! `sieve` command-line entrypoint.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use sieve::config::Config;
use sieve::evaluation::{EvaluationOutcome, list_models};
use sieve::novelty::{NoveltyAssessment, RankingPolicy};
use sieve::{AnalysisReport, GeminiAnalyzer};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Novelty screening and rubric scoring for research proposals.
#[derive(Parser, Debug)]
#[command(name = "sieve", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one proposal PDF against the corpus.
    Analyze {
        /// Proposal PDF to analyze.
        pdf: PathBuf,
        /// Corpus directory (overrides SIEVE_CORPUS_DIR).
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Number of matches to report (defaults to SIEVE_TOP_K).
        #[arg(long, conflicts_with = "all")]
        top_k: Option<usize>,
        /// Report every scored corpus document.
        #[arg(long)]
        all: bool,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List Gemini models available to the configured key.
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Analyze {
            pdf,
            corpus,
            top_k,
            all,
            json,
        } => {
            let config = match corpus {
                Some(dir) => config.with_corpus_dir(dir),
                None => config,
            };
            let policy = if all {
                RankingPolicy::Full
            } else {
                RankingPolicy::TopK(top_k.unwrap_or(config.top_k))
            };

            tracing::info!(
                pdf = %pdf.display(),
                corpus = %config.corpus_dir.display(),
                ?policy,
                "Sieve starting"
            );

            let analyzer = GeminiAnalyzer::from_config(&config)?.with_policy(policy);
            let report = analyzer
                .analyze_file(&pdf)
                .await
                .with_context(|| format!("analysis of {} failed", pdf.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
        Commands::Models => {
            config.validate()?;
            let names = list_models(&config).await?;
            if names.is_empty() {
                println!("No models found for this key.");
            }
            for name in names {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    println!("Proposal: {} ({} characters)", report.source, report.characters);
    println!();

    match &report.novelty {
        NoveltyAssessment::Unavailable { reason } => {
            println!("Novelty: unavailable ({reason})");
        }
        NoveltyAssessment::NoReferences { .. } => {
            println!("Novelty: no reference documents to compare against");
        }
        NoveltyAssessment::Assessed {
            matches,
            originality,
            scan,
        } => {
            println!(
                "Originality: {originality:.1}% ({} of {} corpus documents compared)",
                scan.scored, scan.eligible
            );
            for m in matches {
                let flag = if m.exceeds_threshold { " *" } else { "" };
                println!(
                    "  {:.3}  {:>5.1}% unique  {}{flag}",
                    m.similarity,
                    m.uniqueness_percent(),
                    m.document
                );
            }
        }
    }
    println!();

    match &report.evaluation {
        EvaluationOutcome::Structured(rubric) => {
            for (name, dim) in rubric.dimensions() {
                println!("{name:>11}: {:>2}/10  {}", dim.score, dim.justification);
            }
            println!(
                "    average: {:.1}/10 ({}), highest {}/10, {} area(s) to improve",
                rubric.average(),
                rubric.potential(),
                rubric.highest(),
                rubric.areas_to_improve()
            );
            println!();
            println!("Strengths: {}", rubric.strengths);
            println!("Weaknesses: {}", rubric.weaknesses);
        }
        EvaluationOutcome::Unstructured(text) => {
            println!("Evaluation (unstructured):");
            println!("{text}");
        }
        EvaluationOutcome::Failed(reason) => {
            println!("Evaluation failed: {reason}");
        }
    }
}
