use crate::model::activity::LogEntry;
use crate::model::record::{Record, text_or_placeholder};
use crate::ops::matcher::{ResolveError, resolve_record};
use crate::provider::{ElementProvider, ProviderError};

/// Label of the edit group wrapping an apply run
pub const APPLY_EDIT_GROUP: &str = "Update texts";

/// Why a record was skipped. Both reasons share the skipped tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The live text already equals the record text
    UpToDate,
    /// The live element cannot take a new literal value
    Unwritable,
}

/// Why a record failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    NotFound,
    Fault(String),
    /// The run stopped before this record was attempted
    Aborted,
}

/// Classification of one record in an apply run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Skipped(SkipReason),
    Failed(FailReason),
}

/// Outcome counters for one apply run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.skipped + self.failed
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Summary: updated {}, skipped {}, failed {}",
            self.updated, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Write changed text onto live elements
    Write,
    /// Classify only; nothing is written and no edit group is opened
    DryRun,
}

/// Result of an apply run
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub tally: Tally,
    /// One outcome per input record, in input order
    pub outcomes: Vec<Outcome>,
    /// Status lines, ending with the summary
    pub log: Vec<LogEntry>,
    /// Set when the run stopped early
    pub aborted: Option<ProviderError>,
}

/// Apply record text onto matching live elements.
///
/// Every record is classified as updated, skipped or failed; a per-record
/// fault never stops the loop. Only a [`ProviderError::Unavailable`] aborts,
/// and then the remaining records count as failed. In `Write` mode the whole
/// run is one edit group, closed on every path.
pub fn apply(provider: &mut dyn ElementProvider, records: &[Record], mode: ApplyMode) -> ApplyReport {
    let mut report = ApplyReport {
        tally: Tally::default(),
        outcomes: Vec::with_capacity(records.len()),
        log: vec![LogEntry::info(match mode {
            ApplyMode::Write => "Updating text elements...",
            ApplyMode::DryRun => "Checking text elements (dry run)...",
        })],
        aborted: None,
    };

    if mode == ApplyMode::Write {
        provider.begin_edit_group(APPLY_EDIT_GROUP);
    }

    for (i, record) in records.iter().enumerate() {
        match apply_one(provider, record, mode) {
            Ok((outcome, line)) => {
                if let Some(line) = line {
                    report.log.push(line);
                }
                report.tally.record(&outcome);
                report.outcomes.push(outcome);
            }
            Err(err) => {
                report
                    .log
                    .push(LogEntry::error(format!("General error during update: {}", err)));
                for _ in i..records.len() {
                    let outcome = Outcome::Failed(FailReason::Aborted);
                    report.tally.record(&outcome);
                    report.outcomes.push(outcome);
                }
                report.aborted = Some(err);
                break;
            }
        }
    }

    if mode == ApplyMode::Write {
        provider.end_edit_group();
    }

    let summary = report.tally.summary_line();
    report.log.push(if report.tally.failed == 0 {
        LogEntry::success(summary)
    } else {
        LogEntry::warning(summary)
    });
    tracing::info!(
        updated = report.tally.updated,
        skipped = report.tally.skipped,
        failed = report.tally.failed,
        "apply finished"
    );
    report
}

/// Classify (and in `Write` mode, apply) one record.
/// `Err` is reserved for the catastrophic path.
fn apply_one(
    provider: &mut dyn ElementProvider,
    record: &Record,
    mode: ApplyMode,
) -> Result<(Outcome, Option<LogEntry>), ProviderError> {
    let handle = match resolve_record(provider, record) {
        Ok(handle) => handle,
        Err(ResolveError::NotFound { .. }) => {
            return Ok((
                Outcome::Failed(FailReason::NotFound),
                Some(LogEntry::error(format!(
                    "Element not found: {} in container {}",
                    record.element_name, record.container_name
                ))),
            ));
        }
        Err(ResolveError::Provider(err)) => return fault(record, err),
    };

    let state = match provider.text_property(handle) {
        Ok(Some(state)) if state.accepts_text() => state,
        Ok(_) => {
            return Ok((
                Outcome::Skipped(SkipReason::Unwritable),
                Some(LogEntry::warning(format!(
                    "Cannot modify text of element: {}",
                    record.element_name
                ))),
            ));
        }
        Err(err) => return fault(record, err),
    };

    if text_or_placeholder(state.value.as_deref()) == record.text {
        tracing::debug!(
            container = %record.container_name,
            index = record.element_index,
            "already up to date"
        );
        return Ok((Outcome::Skipped(SkipReason::UpToDate), None));
    }

    if mode == ApplyMode::Write
        && let Err(err) = provider.set_text(handle, &record.text)
    {
        return fault(record, err);
    }
    tracing::debug!(
        container = %record.container_name,
        index = record.element_index,
        "updated"
    );
    Ok((Outcome::Updated, None))
}

fn fault(
    record: &Record,
    err: ProviderError,
) -> Result<(Outcome, Option<LogEntry>), ProviderError> {
    if let ProviderError::Unavailable(_) = err {
        return Err(err);
    }
    Ok((
        Outcome::Failed(FailReason::Fault(err.to_string())),
        Some(LogEntry::error(format!(
            "Error updating text of element '{}': {}",
            record.element_name, err
        ))),
    ))
}
