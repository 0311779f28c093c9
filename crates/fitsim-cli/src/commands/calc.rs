//! Calc command handler: restore a fit, project other fits onto it and
//! report its modified attributes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use fitsim_lib::{Catalog, Fit, FitRecord, FitReport, SharedFit};

use crate::config::OutputFormat;

/// Options for one calc invocation.
#[derive(Debug, Clone, Default)]
pub struct CalcOptions {
    pub fit: PathBuf,
    pub projected: Vec<PathBuf>,
    pub attributes: Vec<String>,
    pub changed_only: bool,
    pub format: OutputFormat,
}

pub fn handle_calc(catalog: &Catalog, options: &CalcOptions) -> Result<()> {
    let report = build_report(catalog, options)?;
    let rendered = report
        .render(options.format.into())
        .context("failed to render fit report")?;
    print!("{rendered}");
    if options.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// Restore the fit and its projectors, then calculate.
pub fn build_report(catalog: &Catalog, options: &CalcOptions) -> Result<FitReport> {
    let mut fit = restore_fit(catalog, &options.fit)?;
    // projected fits are weakly linked and must outlive the report
    let mut sources: Vec<SharedFit> = Vec::with_capacity(options.projected.len());
    for path in &options.projected {
        let source = restore_fit(catalog, path)?.into_shared();
        let projected = fit.project_fit(&source);
        info!(path = %path.display(), projected, "projected fit");
        sources.push(source);
    }

    let mut report = FitReport::from_fit(&mut fit, &options.attributes);
    if options.changed_only {
        report.rows = report.changed_rows().cloned().collect();
    }
    for failure in &report.failures {
        warn!(holder = %failure.holder, "{}", failure.message);
    }
    Ok(report)
}

fn restore_fit(catalog: &Catalog, path: &Path) -> Result<Fit> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read fit from {}", path.display()))?;
    let record: FitRecord = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse fit record {}", path.display()))?;
    let fit = Fit::restore(&record, catalog)
        .with_context(|| format!("failed to restore fit {}", path.display()))?;
    for issue in fit.restore_issues() {
        warn!(
            kind = %issue.kind,
            item_id = issue.item_id,
            "skipped stored holder: {}",
            issue.reason
        );
    }
    Ok(fit)
}
