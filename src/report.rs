use std::io::Write;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::{info, warn};

use crate::availability::AvailabilityEvaluator;
use crate::error::TerminalError;
use crate::models::{Availability, TerminalRecord};
use crate::services::{Geocoder, TerminalDirectory, TimezoneLookup};

/// Counts for one run over a list of terminal ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Check every id in order and write human-readable lines to `out`.
///
/// A failing id produces an error line and the batch moves on; only
/// write errors on `out` stop the run.
pub async fn report_terminals<D, G, T, W>(
    ids: &[String],
    directory: &D,
    evaluator: &mut AvailabilityEvaluator<G, T>,
    now: DateTime<FixedOffset>,
    out: &mut W,
) -> std::io::Result<BatchSummary>
where
    D: TerminalDirectory + ?Sized,
    G: Geocoder,
    T: TimezoneLookup,
    W: Write,
{
    let mut summary = BatchSummary::default();
    info!("Checking {} terminal(s) against {}", ids.len(), directory.source_name());

    for id in ids {
        summary.processed += 1;

        let record = match directory.fetch(id).await {
            Ok(raw) => TerminalRecord::from_value(raw),
            Err(err) => Err(err),
        };

        let record = match record {
            Ok(record) => record,
            Err(TerminalError::Fetch { status, .. }) => {
                summary.failed += 1;
                writeln!(
                    out,
                    "Could not get terminal info by id. Id is: {id}. Response code: {status}"
                )?;
                continue;
            }
            Err(err) => {
                warn!(terminal = %id, error = %err, "skipping terminal");
                summary.failed += 1;
                writeln!(out, "Could not load terminal {id}: {err}")?;
                continue;
            }
        };

        writeln!(
            out,
            "Current terminal id is {} ({}). Current terminal status is {} (code {})",
            id,
            record.name(),
            label(record.status()),
            label(record.status_code()),
        )?;

        match evaluator.evaluate(&record, now).await {
            Ok(evaluation) => {
                let line = match evaluation.availability {
                    Availability::Open => "Current terminal is working at this hour",
                    Availability::Closed => "Current terminal is not working at this hour",
                    Availability::Unknown => "Working hours data is not found for current terminal",
                };
                writeln!(out, "{line}")?;
            }
            Err(err) => {
                warn!(terminal = %id, error = %err, "availability check failed");
                summary.failed += 1;
                writeln!(out, "Could not determine working hours for terminal {id}: {err}")?;
            }
        }
    }

    Ok(summary)
}

fn label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
