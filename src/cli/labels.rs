//! Label reconciliation across the selected repositories.

use std::io::Write;

use prsweep::github::Label;
use prsweep::labels::{ApplyScope, LabelPlan, apply, default_labels, load_labels, plan_for};
use prsweep::{RepositoryLocator, SweepError};

use super::output::line;
use super::{GitHub, Run, skip};

/// Reports missing, incorrect and extra labels per repository and, when
/// asked to, fixes them.
///
/// `--fix-labels` adds and recolours; `--prune-labels` also deletes extra
/// labels. `--no-op` suppresses every write.
///
/// # Errors
///
/// Returns a labels file error or an output error; repository failures are
/// skipped.
pub async fn run<G: GitHub, W: Write>(run: &Run<'_, G>, writer: &mut W) -> Result<(), SweepError> {
    let desired = match run.config.labels_file.as_deref() {
        Some(path) => load_labels(path)?,
        None => default_labels(),
    };
    let writes = (run.config.fix_labels || run.config.prune_labels) && !run.config.no_op;
    let scope = ApplyScope {
        prune: run.config.prune_labels,
    };

    for repository in &run.repositories {
        match reconcile(run.github(), repository, &desired, writes.then_some(scope)).await {
            Ok(plan) => describe(writer, repository, &plan)?,
            Err(error) => skip(repository, &error),
        }
    }
    Ok(())
}

async fn reconcile<G: GitHub>(
    gateway: &G,
    repository: &RepositoryLocator,
    desired: &[Label],
    scope: Option<ApplyScope>,
) -> Result<LabelPlan, SweepError> {
    let plan = plan_for(gateway, repository, desired).await?;
    if let Some(scope) = scope {
        apply(gateway, repository, &plan, scope).await?;
    }
    Ok(plan)
}

fn describe<W: Write>(
    writer: &mut W,
    repository: &RepositoryLocator,
    plan: &LabelPlan,
) -> Result<(), SweepError> {
    if plan.is_empty() {
        return line(writer, format_args!("{repository}: labels match"));
    }
    let names = |labels: &[Label]| {
        labels
            .iter()
            .map(|label| label.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    line(writer, format_args!("{repository}:"))?;
    if !plan.missing.is_empty() {
        line(writer, format_args!("  missing: {}", names(&plan.missing)))?;
    }
    if !plan.incorrect.is_empty() {
        line(writer, format_args!("  incorrect: {}", names(&plan.incorrect)))?;
    }
    if !plan.extra.is_empty() {
        line(writer, format_args!("  extra: {}", plan.extra.join(", ")))?;
    }
    Ok(())
}
