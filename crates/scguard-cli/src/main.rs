use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scguard_core::assess;
use scguard_core::batch::extract_each;
use scguard_core::config::PolicyProfile;
use scguard_core::facts::read_facts;
use scguard_core::features::FeatureExtractor;
use scguard_core::report::{model::ToolInfo, render};
use scguard_core::scoring::FixedProbabilities;

mod args;

use args::{AssessArgs, Command, OutputFormat};

/// Exit code for usage, input and provider failures; 0/1/2 are decisions.
const EXIT_FAILURE: i32 = 3;

fn main() {
    // clap exits with 2 on usage errors, which would read as BLOCK.
    let args = match args::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    init_logging(args.verbose);

    let result = match args.command {
        Command::Features {
            facts_path,
            per_contract,
            out,
        } => features(&facts_path, per_contract, out.as_deref()).map(|()| 0),
        Command::Assess(assess_args) => run_assess(assess_args),
    };

    let exit_code = result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        EXIT_FAILURE
    });

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("scguard=debug")
    } else {
        EnvFilter::new("scguard=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={verbose})");
}

fn features(facts_path: &Path, per_contract: bool, out: Option<&Path>) -> Result<()> {
    let doc = read_facts(facts_path)?;

    let output = if per_contract {
        serde_json::to_string_pretty(&extract_each(&doc.contracts))?
    } else {
        let features = FeatureExtractor::new(&doc.contracts)
            .extract()
            .with_context(|| format!("feature extraction failed for {}", facts_path.display()))?;
        serde_json::to_string_pretty(&features)?
    };

    emit(&output, out)
}

fn run_assess(args: AssessArgs) -> Result<i32> {
    let facts = read_facts(&args.facts_path)?;

    let mut provider = FixedProbabilities::load(&args.probabilities)?;
    if let Some(path) = &args.importance {
        provider = provider.load_importance(path)?;
    }

    let profile = match &args.config {
        Some(path) => PolicyProfile::load(path)?,
        None => PolicyProfile::default(),
    };

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let report = assess(&facts, &provider, &profile, tool)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render::render_text(&report),
    };
    emit(&output, args.out.as_deref())?;

    Ok(report.exit_code())
}

fn emit(output: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}
