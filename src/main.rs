//! CLI tool for renaming scanned Thai identity documents.
//!
//! Dry run by default: prints the rename plan and the files it could not
//! resolve. With `--apply` the renames are performed as well.

use clap::Parser;
use idcard_rename::{
    BatchPlan, BatchRenamer, MoveOutcome, OcrConfig, RenamerConfig, Result, DEFAULT_PREFIX,
    DEFAULT_TARGET_WIDTH,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "idcard-rename", version)]
#[command(about = "Rename scanned Thai ID documents to {title}_{first}_{last}_{id}.{ext}")]
struct Args {
    /// Directory holding the scanned documents
    #[arg(env = "IDCARD_RENAME_DIR")]
    directory: PathBuf,

    /// Perform the renames instead of only printing the plan
    #[arg(long)]
    apply: bool,

    /// Only files whose name starts with this marker are processed
    #[arg(long, env = "IDCARD_RENAME_PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// OCR languages, most expected first, joined with '+'
    #[arg(long, default_value = "tha+eng")]
    languages: String,

    /// Directory containing Tesseract's traineddata files
    #[arg(long, env = "TESSDATA_PREFIX")]
    tessdata: Option<PathBuf>,

    /// Pixel width PDF pages are rendered to before OCR
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
    target_width: u32,

    /// Seconds a single OCR call may take before the document is skipped
    #[arg(long, default_value_t = 120)]
    ocr_timeout: u64,

    /// Only list files that do not follow the naming convention
    #[arg(long, conflicts_with = "apply")]
    verify: bool,
}

impl Args {
    fn into_config(self) -> RenamerConfig {
        RenamerConfig {
            directory: self.directory,
            prefix: self.prefix,
            apply: self.apply,
            ocr: OcrConfig {
                languages: self
                    .languages
                    .split('+')
                    .map(str::trim)
                    .filter(|lang| !lang.is_empty())
                    .map(String::from)
                    .collect(),
                tessdata_dir: self.tessdata,
                target_width: self.target_width,
                timeout: Duration::from_secs(self.ocr_timeout),
            },
        }
    }
}

fn main() {
    // A missing .env is fine; everything also comes from flags.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("idcard_rename=info")),
        )
        .init();

    let args = Args::parse();
    let verify = args.verify;
    let renamer = BatchRenamer::new(args.into_config());

    let outcome = if verify {
        run_verify(&renamer)
    } else {
        run_batch(&renamer)
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ Error: {}", e);
        process::exit(1);
    }
}

fn run_batch(renamer: &BatchRenamer) -> Result<()> {
    let config = renamer.config();
    println!("🔍 Scanning: {}", config.directory.display());
    println!("🏷️  Prefix: {}", config.prefix);
    println!("⚙️  Mode: {}", if config.apply { "apply" } else { "dry run" });
    println!("{}", "─".repeat(60));

    let plan = renamer.plan()?;
    print_plan(&plan);

    if config.apply && !plan.renames.is_empty() {
        println!("\n🚀 Applying renames:");
        let outcomes = renamer.apply(&plan, print_outcome);
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        println!("   • {} renamed, {} failed", outcomes.len() - failed, failed);
    }

    print_unresolved(&plan);

    println!("\n{}", "─".repeat(60));
    println!("📊 Summary:");
    println!("   • {} planned", plan.renames.len());
    println!("   • {} already named", plan.unchanged.len());
    println!("   • {} unresolved", plan.unresolved.len());

    Ok(())
}

fn print_plan(plan: &BatchPlan) {
    println!("📋 Planned renames: {}", plan.renames.len());
    for rename in &plan.renames {
        println!("   {} -> {}", rename.source, rename.target);
    }
}

fn print_outcome(outcome: &MoveOutcome) {
    let plan = &outcome.plan;
    match &outcome.result {
        Ok(()) => println!("   ✅ RENAMED: {} -> {}", plan.source, plan.target),
        Err(e) => println!("   ❌ FAILED: {} -> {} ({})", plan.source, plan.target, e),
    }
}

fn print_unresolved(plan: &BatchPlan) {
    println!("\n⚠️  Unresolved: {}", plan.unresolved.len());
    for item in &plan.unresolved {
        println!("   UNRESOLVED: {} ({})", item.file_name, item.reason);
    }
}

fn run_verify(renamer: &BatchRenamer) -> Result<()> {
    println!("🔍 Checking names in: {}", renamer.config().directory.display());
    println!("{}", "─".repeat(60));

    let offenders = renamer.verify()?;
    if offenders.is_empty() {
        println!("✅ Every file follows the naming convention");
    } else {
        println!("⚠️  {} file(s) do not follow the naming convention:", offenders.len());
        for name in &offenders {
            println!("   {}", name);
        }
    }

    Ok(())
}
