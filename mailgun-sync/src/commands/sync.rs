//! Template sync command

use anyhow::{Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::SyncConfig;
use crate::remote::MailgunClient;
use crate::sync::{SyncReport, Synchronizer, TemplateOutcome};
use crate::templates::{load_partials, load_templates, Renderer};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static PLAN: Emoji<'_, '_> = Emoji("→ ", "> ");
static UPLOAD: Emoji<'_, '_> = Emoji("⬆️  ", "");

/// Upload every local template to Mailgun
pub struct SyncCommand {
    config: SyncConfig,
    dry_run: bool,
    strict: bool,
}

impl SyncCommand {
    /// Create a new command instance
    pub const fn new(config: SyncConfig, dry_run: bool, strict: bool) -> Self {
        Self {
            config,
            dry_run,
            strict,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The templates or partials directory cannot be read
    /// - `strict` is set and at least one template failed
    pub fn execute(&self) -> Result<()> {
        let templates_dir = &self.config.templates_dir;
        let partials_dir = self.config.partials_dir();

        let templates = load_templates(templates_dir).with_context(|| {
            format!("Failed to load templates from {}", templates_dir.display())
        })?;
        let partials = load_partials(&partials_dir).with_context(|| {
            format!("Failed to load partials from {}", partials_dir.display())
        })?;

        println!(
            "{UPLOAD}{} {} templates ({} partials) from {}",
            style(if self.dry_run { "Planning" } else { "Syncing" }).green().bold(),
            templates.len(),
            partials.len(),
            style(templates_dir.display()).cyan()
        );
        println!();

        let renderer = Renderer::new(&partials);
        let client = MailgunClient::new(&self.config);
        let synchronizer = Synchronizer::new(&client, &renderer).dry_run(self.dry_run);

        let progress = ProgressBar::new(templates.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{pos}/{len}] {msg}")
                .context("Failed to set progress style")?,
        );

        let report = synchronizer.run_with(&templates, |outcome| {
            progress.suspend(|| println!("{}", outcome_line(outcome, self.dry_run)));
            progress.inc(1);
        });
        progress.finish_and_clear();

        print_summary(&report);

        if self.strict && report.has_failures() {
            anyhow::bail!("{} template(s) failed to sync", report.failed());
        }

        Ok(())
    }
}

fn outcome_line(outcome: &TemplateOutcome, dry_run: bool) -> String {
    match &outcome.result {
        Ok(decision) if dry_run => format!(
            "  {PLAN}{} would be {}",
            style(&outcome.name).cyan(),
            decision
        ),
        Ok(decision) => format!("  {CHECK}{} {}", style(&outcome.name).green(), decision),
        Err(e) => format!("  {CROSS}{} - {}", style(&outcome.name).red(), e),
    }
}

fn print_summary(report: &SyncReport) {
    println!();
    let verb = if report.dry_run { "planned" } else { "done" };
    println!(
        "{} {} created, {} updated, {} failed",
        style(format!("Sync {verb}:")).bold(),
        style(report.created()).green(),
        style(report.updated()).green(),
        if report.has_failures() {
            style(report.failed()).red()
        } else {
            style(report.failed()).dim()
        }
    );
}
