use colored::Colorize;
use reconcile::{ExecuteSummary, PlanSummary, Report};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print plan counts
pub fn plan_summary(summary: &PlanSummary) {
    println!(
        "  {} to add, {} to change, {} to remove",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );
}

/// Print the numbered success/failure lines of a report
pub fn report(report: &Report) {
    for line in report.lines() {
        if line.starts_with("Failure") {
            println!("  {}", line.red());
        } else if line.starts_with("Success") {
            println!("  {}", line.green());
        } else {
            println!("  {}", line.dimmed());
        }
    }
}

/// Print final summary
pub fn execute_summary(summary: &ExecuteSummary, dry_run: bool) {
    println!();
    let verb = if dry_run { "recorded" } else { "applied" };
    if summary.is_success() {
        println!("  {} Sync {} successfully", "✓".green().bold(), verb);
    } else {
        println!("  {} Sync {} with errors", "⚠".yellow().bold(), verb);
    }

    if summary.created > 0 {
        println!("    • {} created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} modified", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {}", summary.failed, "failed".red());
    }
}
