use colored::Colorize;
use redline_checks::{CheckContext, CheckResult, ValidationReport, Validator, ValidatorConfig};
use redline_package::{PartSource, DEFAULT_MAIN_PART};
use redline_revision::{TextProjector, TrackedChangeResolver};
use redline_tree::Document;
use tracing::debug;

use crate::cli::*;

/// Run one subcommand. Returns `false` when validation failed.
pub fn run_command(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Validate(args) => cmd_validate(args, &cli.format),
        Command::Project(args) => cmd_project(args, &cli.format).map(|_| true),
        Command::Revert(args) => cmd_revert(args, &cli.format).map(|_| true),
    }
}

fn cmd_validate(args: ValidateArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    let mut config = match &args.config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };
    if let Some(author) = args.author {
        config.author = author;
    }

    let edited = PartSource::from_path(&args.edited);
    let original = PartSource::from_path(&args.original);
    debug!(edited = %edited.describe(), original = %original.describe(), "validating");

    let context = CheckContext::new(edited, config).with_original(original);
    let report = Validator::with_default_checks().run(&context);

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_report(&report, &context),
    }
    Ok(report.passed)
}

fn print_report(report: &ValidationReport, context: &CheckContext) {
    println!(
        "Validating {} against {} (author: {})",
        context.edited.describe().bold(),
        context
            .original
            .as_ref()
            .map(PartSource::describe)
            .unwrap_or_default()
            .bold(),
        report.author.cyan()
    );
    for result in &report.results {
        print_result(result);
    }
    if let Some(delta) = &report.paragraphs {
        println!("\n{delta}");
    }
    println!();
    if report.passed {
        println!("{} All validations PASSED", "✓".green().bold());
    } else {
        println!(
            "{} Validation FAILED ({} of {} checks)",
            "✗".red().bold(),
            report.failures().count(),
            report.results.len()
        );
    }
}

fn print_result(result: &CheckResult) {
    if result.passed {
        println!("  {} {}", "✓".green(), result.check_name);
    } else {
        println!(
            "  {} {} ({} violation(s))",
            "✗".red(),
            result.check_name.bold(),
            result.violations.len()
        );
    }
    for note in &result.notes {
        println!("      {}", note.dimmed());
    }
    for violation in &result.violations {
        println!("      {}", violation.location.to_string().yellow());
        for line in violation.message.lines() {
            println!("        {line}");
        }
    }
    if let Some(diff) = &result.diff {
        println!();
        for line in diff.lines() {
            if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", line.bold());
            } else if line.starts_with('+') {
                println!("{}", line.green());
            } else if line.starts_with('-') {
                println!("{}", line.red());
            } else if line.starts_with("@@") {
                println!("{}", line.cyan());
            } else {
                println!("{line}");
            }
        }
    }
}

fn load_document(input: &std::path::Path) -> anyhow::Result<Document> {
    let xml = PartSource::from_path(input).load(DEFAULT_MAIN_PART)?;
    Ok(Document::parse(&xml)?)
}

fn cmd_project(args: ProjectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut doc = load_document(&args.input)?;
    if let Some(author) = &args.author {
        doc = TrackedChangeResolver::new(author.as_str()).resolve(&doc);
    }
    let projection = TextProjector::default().project(&doc);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&projection)?),
        OutputFormat::Text => {
            for paragraph in &projection.paragraphs {
                println!("{paragraph}");
            }
        }
    }
    Ok(())
}

fn cmd_revert(args: RevertArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let doc = load_document(&args.input)?;
    let (reverted, stats) = TrackedChangeResolver::new(args.author.as_str()).resolve_with_stats(&doc);
    let xml = reverted.to_xml()?;

    let Some(output) = &args.output else {
        println!("{xml}");
        return Ok(());
    };
    std::fs::write(output, xml)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!(
                "{} Reverted {}'s changes into {}",
                "✓".green().bold(),
                args.author.cyan(),
                output.display().to_string().bold()
            );
            println!("  Insertions removed: {}", stats.insertions_removed);
            println!("  Deletions restored: {}", stats.deletions_restored);
        }
    }
    Ok(())
}
