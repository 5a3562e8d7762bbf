use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use checkdeps::analysis::ExtractorOptions;
use checkdeps::report::{self, ReportFormat};
use checkdeps::workspace::SourceOptions;
use checkdeps::{check_monorepo, CheckError, CheckOptions};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkdeps")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Detects unused and missing dependencies across the workspaces of a monorepo", long_about = None)]
struct Cli {
    /// Monorepo root directory (defaults to the current directory)
    root: Option<PathBuf>,

    /// Options for the usage extractor, as a JSON object
    #[arg(value_name = "OPTIONS_JSON", default_value = r#"{"excludeDev":true}"#)]
    options: String,

    /// Output format: text or json
    #[arg(short, long, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Leave out paths starting with "example"
    #[arg(long)]
    exclude_examples: bool,

    /// Source file extensions to check (defaults to js,jsx)
    #[arg(long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Workspace to leave out of the run (repeatable)
    #[arg(long = "exclude-workspace", value_name = "PATH")]
    exclude_workspaces: Vec<String>,

    /// Exit with 0 even when findings are reported
    #[arg(long)]
    no_fail: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn check_options(&self) -> anyhow::Result<CheckOptions> {
        let extractor: ExtractorOptions = serde_json::from_str(&self.options)
            .with_context(|| format!("Invalid options JSON: {}", self.options))?;

        let mut sources = SourceOptions {
            exclude_examples: self.exclude_examples,
            ..SourceOptions::default()
        };
        if !self.extensions.is_empty() {
            sources.extensions = self.extensions.clone();
        }
        sources.patterns().context("Invalid --extensions")?;

        Ok(CheckOptions {
            extractor,
            sources,
            exclude_workspaces: self.exclude_workspaces.clone(),
            fail_on_findings: !self.no_fail,
        })
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let options = cli.check_options()?;
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let report = check_monorepo(&root, &options)?;

    let rendered = report::render_to_string(cli.format, &report)?;
    if cli.format == ReportFormat::Text && !report.is_clean() {
        io::stderr().write_all(rendered.as_bytes())?;
    } else {
        io::stdout().write_all(rendered.as_bytes())?;
    }

    Ok(ExitCode::from(report.exit_code() as u8))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            if let Some(dir) = err.downcast_ref::<CheckError>().and_then(CheckError::workspace) {
                eprintln!("\nError for {}\n", dir.display());
            }
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
