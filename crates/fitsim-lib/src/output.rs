use std::fmt::Write;

use serde::Serialize;

use crate::calc::CalcFailure;
use crate::error::Result;
use crate::fit::Fit;
use crate::holder::Holder;
use crate::records::RestoreIssue;

/// Presentation style for turning a [`FitReport`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

/// One attribute of one holder after calculation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttributeRow {
    /// Holder position, e.g. `module[0]`.
    pub holder: String,
    pub item: String,
    pub attribute: String,
    /// Unmodified value, absent when the item neither carries nor defaults it.
    pub base: Option<f64>,
    pub modified: f64,
}

impl AttributeRow {
    fn changed(&self) -> bool {
        self.base != Some(self.modified)
    }
}

/// Structured snapshot of a calculated fit that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FitReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ship: String,
    pub generation: u64,
    pub rows: Vec<AttributeRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CalcFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub restore_issues: Vec<RestoreIssue>,
}

impl FitReport {
    /// Recalculate `fit` if needed and collect its attributes.
    ///
    /// With a non-empty `attributes` filter only the named attributes are
    /// reported; holders without them are skipped.
    pub fn from_fit(fit: &mut Fit, attributes: &[String]) -> Self {
        let failures = fit.recalculate().failures.clone();

        let mut rows = Vec::new();
        for holder in fit.holder_refs() {
            let Some(store) = fit.store(holder) else {
                continue;
            };
            for (attribute, modified) in store.snapshot() {
                if !attributes.is_empty() && !attributes.contains(&attribute) {
                    continue;
                }
                rows.push(AttributeRow {
                    holder: holder.to_string(),
                    item: store.item().name.clone(),
                    base: store.original(&attribute),
                    attribute,
                    modified,
                });
            }
        }

        Self {
            name: fit.name().map(str::to_string),
            ship: fit.ship().item().name.clone(),
            generation: fit.generation(),
            rows,
            failures,
            restore_issues: fit.restore_issues().to_vec(),
        }
    }

    /// Rows whose modified value differs from the base value.
    pub fn changed_rows(&self) -> impl Iterator<Item = &AttributeRow> {
        self.rows.iter().filter(|row| row.changed())
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.to_json(),
            ReportFormat::Csv => self.to_csv(),
        }
    }

    fn render_text(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{} ({}, generation {})",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.ship,
            self.generation
        );
        for row in &self.rows {
            let marker = if row.changed() { "*" } else { " " };
            let base = row
                .base
                .map(|value| format!("{value:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                buffer,
                "{marker} {:<20} {:<28} {:<24} {:>12} -> {:>12.2}",
                row.holder, row.item, row.attribute, base, row.modified
            );
        }
        for failure in &self.failures {
            let _ = writeln!(
                buffer,
                "! {} ({:?}): {}",
                failure.holder, failure.run_time, failure.message
            );
        }
        for issue in &self.restore_issues {
            let _ = writeln!(
                buffer,
                "! skipped {} {}: {}",
                issue.kind, issue.item_id, issue.reason
            );
        }
        buffer
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attribute rows as CSV with a header line. Failures are not included.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::Item;
    use crate::fit::HolderRef;
    use crate::holder::Ship;

    fn report() -> FitReport {
        let item = Arc::new(
            Item::new(587, "Rifter", "Frigate", "Ship")
                .with_attribute("maxVelocity", 200.0)
                .with_attribute("shieldCapacity", 450.0),
        );
        let mut fit = Fit::new(Ship::new(item).expect("ship")).with_name("scout");
        fit.set_override(HolderRef::Ship, "maxVelocity", 250.0)
            .expect("override");
        FitReport::from_fit(&mut fit, &[])
    }

    #[test]
    fn rows_cover_every_ship_attribute() {
        let report = report();
        assert_eq!(report.ship, "Rifter");
        assert_eq!(report.rows.len(), 2);
        let changed: Vec<_> = report.changed_rows().map(|r| r.attribute.as_str()).collect();
        assert_eq!(changed, vec!["maxVelocity"]);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = report().render(ReportFormat::Csv).expect("csv");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("holder,item,attribute,base,modified"));
        assert_eq!(lines.next(), Some("ship,Rifter,maxVelocity,200.0,250.0"));
    }

    #[test]
    fn text_marks_changed_rows() {
        let text = report().render(ReportFormat::Text).expect("text");
        assert!(text.starts_with("scout (Rifter, generation"));
        assert!(text.lines().any(|line| line.starts_with('*') && line.contains("maxVelocity")));
    }

    #[test]
    fn json_omits_empty_diagnostics() {
        let json = report().render(ReportFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parses");
        assert!(value.get("failures").is_none());
        assert_eq!(value["rows"][0]["holder"], "ship");
    }
}
