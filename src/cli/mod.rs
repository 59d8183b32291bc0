//! # CLI Module
//!
//! Command-line interface for the product matcher.
//!
//! ## Usage
//! ```bash
//! # Compare a captured photo against its reference
//! product-match compare reference_product.jpg current_product.jpg
//!
//! # RAW reference against a standard capture
//! product-match compare reference.dng current.jpg
//!
//! # JSON output for scripting
//! product-match compare ref.jpg cur.jpg --output json
//!
//! # Bare number only (-1 on failure)
//! product-match compare ref.jpg cur.jpg --output minimal
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use product_match::core::scorer::{Scorer, SimilarityScore};
use product_match::error::Result;
use product_match::events::{CompareEvent, Event, EventChannel};
use std::path::{Path, PathBuf};
use std::thread;

/// Product Match - verify a captured product photo against its reference
#[derive(Parser, Debug)]
#[command(name = "product-match")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare a current product photo against a reference image
    Compare {
        /// Reference product image (raster formats or .dng)
        reference: PathBuf,

        /// Current product image to verify
        current: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Bare percentage only, -1.00 on failure
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            reference,
            current,
            output,
            verbose,
        } => run_compare(reference, current, output, verbose),
    }
}

fn run_compare(
    reference: PathBuf,
    current: PathBuf,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Product Match").bold().cyan(),
            style("v0.1.0").dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = EventChannel::new();

    // Echo pipeline progress in verbose pretty mode
    let event_thread = (verbose && matches!(output, OutputFormat::Pretty)).then(|| {
        let term = Term::stderr();
        thread::spawn(move || {
            for event in receiver.iter() {
                match event {
                    Event::Compare(CompareEvent::Decoded {
                        path,
                        width,
                        height,
                    }) => {
                        term.write_line(&format!(
                            "  {} {} ({}x{})",
                            style("decoded").dim(),
                            path.display(),
                            width,
                            height
                        ))
                        .ok();
                    }
                    Event::Compare(CompareEvent::Normalized { width, height }) => {
                        term.write_line(&format!(
                            "  {} {}x{}",
                            style("normalized to").dim(),
                            width,
                            height
                        ))
                        .ok();
                    }
                    _ => {}
                }
            }
        })
    });

    let score = Scorer::new().score_with_events(&reference, &current, &sender);

    // Drop sender to signal the event thread to finish
    drop(sender);
    if let Some(handle) = event_thread {
        handle.join().ok();
    }

    match output {
        OutputFormat::Pretty => print_pretty_result(&term, &reference, &current, score),
        OutputFormat::Json => print_json_result(&reference, &current, score),
        OutputFormat::Minimal => println!("{:.2}", score.legacy_value()),
    }

    Ok(())
}

fn print_pretty_result(term: &Term, reference: &Path, current: &Path, score: SimilarityScore) {
    term.write_line("").ok();

    match score {
        SimilarityScore::Score(percent) => {
            term.write_line(&format!(
                "{} Comparison Complete",
                style("✓").green().bold()
            ))
            .ok();
            term.write_line("").ok();
            term.write_line(&format!(
                "  {} vs {}",
                reference.display(),
                current.display()
            ))
            .ok();
            term.write_line(&format!(
                "  Similarity: {}",
                style(format!("{:.2}%", percent)).cyan().bold()
            ))
            .ok();
        }
        SimilarityScore::Failed => {
            term.write_line(&format!(
                "{} Could not calculate similarity",
                style("✗").red().bold()
            ))
            .ok();
            term.write_line(&format!(
                "  {}",
                style("See the log output for the cause.").dim()
            ))
            .ok();
        }
    }
}

fn print_json_result(reference: &Path, current: &Path, score: SimilarityScore) {
    let similarity_percent = match score {
        SimilarityScore::Score(value) => Some(value),
        SimilarityScore::Failed => None,
    };

    let output = serde_json::json!({
        "reference": reference,
        "current": current,
        "similarity_percent": similarity_percent,
        "failed": score.is_failed(),
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
