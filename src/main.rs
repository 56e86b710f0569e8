//! minuta CLI - meeting minutes PDF to DOCX synopsis

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use minuta::config::AppConfig;
use minuta::gate;
use minuta::presenter::{preview_snippet, Presenter};

#[derive(Parser)]
#[command(name = "minuta")]
#[command(version)]
#[command(about = "Summarize a meeting-minutes PDF and export it as a Word document", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output .docx file (defaults to the input name with a .docx extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Secrets file to load instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Access code, when the secrets file configures one
    #[arg(long, env = "MINUTA_ACCESS_CODE")]
    access_code: Option<String>,

    /// Gemini model override
    #[arg(long)]
    model: Option<String>,

    /// Also write the raw synopsis text to this file
    #[arg(long, value_name = "PATH")]
    synopsis_out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    minuta::init_tracing();

    if let Err(e) = run_cli(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    gate::check_access(config.access_code.as_deref(), cli.access_code.as_deref())?;

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("docx"));

    let presenter = ConsolePresenter::new(3);
    let outcome = minuta::run(&config, &cli.input, &output, &presenter)?;
    presenter.finish();

    if let Some(path) = cli.synopsis_out {
        fs::write(&path, &outcome.synopsis)?;
        println!("{} {}", "Synopsis text saved to".green(), path.display());
    }

    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

/// Terminal presenter: one progress bar across the pipeline stages,
/// warnings and the text preview printed above it.
struct ConsolePresenter {
    bar: ProgressBar,
    started: Cell<bool>,
}

impl ConsolePresenter {
    fn new(stages: u64) -> Self {
        let bar = ProgressBar::new(stages);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self {
            bar,
            started: Cell::new(false),
        }
    }

    fn finish(&self) {
        if self.started.get() {
            self.bar.inc(1);
        }
        self.bar.finish_with_message("Done!");
    }
}

impl Presenter for ConsolePresenter {
    fn status(&self, message: &str) {
        // The previous stage is complete once the next one starts.
        if self.started.replace(true) {
            self.bar.inc(1);
        }
        self.bar.set_message(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.bar
            .println(format!("{}: {}", "Warning".yellow().bold(), message));
    }

    fn preview(&self, text: &str) {
        let snippet = preview_snippet(text);
        self.bar
            .println(format!("{}", "Extracted text preview:".bold()));
        self.bar.println(format!("{}", snippet.dimmed()));
        if snippet.len() < text.len() {
            self.bar.println(format!("{}", "...".dimmed()));
        }
    }

    fn success(&self, message: &str) {
        self.bar
            .println(format!("{} {}", "Done:".green(), message));
    }
}
