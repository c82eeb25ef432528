use serde::Serialize;

use crate::model::activity::LogEntry;
use crate::model::record::{Record, RecordStore};
use crate::ops::reconcile::{ApplyReport, FailReason, Outcome, SkipReason};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ContainerListJson<'a> {
    pub container: &'a str,
    pub records: Vec<&'a Record>,
}

#[derive(Serialize)]
pub struct ApplyJson {
    pub dry_run: bool,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<OutcomeJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

#[derive(Serialize)]
pub struct OutcomeJson {
    pub container: String,
    pub index: usize,
    pub name: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Visible records grouped by container, in first-seen container order
pub fn group_visible<'a>(store: &'a RecordStore, visible: &[usize]) -> Vec<ContainerListJson<'a>> {
    let mut groups: Vec<ContainerListJson<'a>> = Vec::new();
    for (container, indices) in store.group_by_container() {
        let records: Vec<&Record> = indices
            .iter()
            .filter(|i| visible.contains(*i))
            .filter_map(|&i| store.get(i))
            .collect();
        if !records.is_empty() {
            groups.push(ContainerListJson { container, records });
        }
    }
    groups
}

pub fn apply_to_json(records: &[Record], report: &ApplyReport, dry_run: bool) -> ApplyJson {
    ApplyJson {
        dry_run,
        updated: report.tally.updated,
        skipped: report.tally.skipped,
        failed: report.tally.failed,
        outcomes: records
            .iter()
            .zip(&report.outcomes)
            .map(|(record, outcome)| outcome_to_json(record, outcome))
            .collect(),
        aborted: report.aborted.as_ref().map(|e| e.to_string()),
    }
}

fn outcome_to_json(record: &Record, outcome: &Outcome) -> OutcomeJson {
    let (label, reason) = match outcome {
        Outcome::Updated => ("updated", None),
        Outcome::Skipped(SkipReason::UpToDate) => ("skipped", Some("up to date".to_string())),
        Outcome::Skipped(SkipReason::Unwritable) => ("skipped", Some("unwritable".to_string())),
        Outcome::Failed(FailReason::NotFound) => ("failed", Some("not found".to_string())),
        Outcome::Failed(FailReason::Fault(msg)) => ("failed", Some(msg.clone())),
        Outcome::Failed(FailReason::Aborted) => ("failed", Some("aborted".to_string())),
    };
    OutcomeJson {
        container: record.container_name.clone(),
        index: record.element_index,
        name: record.element_name.clone(),
        outcome: label,
        reason,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Grouped listing: a container header followed by indented records
pub fn format_listing(groups: &[ContainerListJson<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", group.container, group.records.len()));
        for record in &group.records {
            lines.push(format!("  {}", record.single_line()));
        }
    }
    lines
}

pub fn format_log_entries(entries: &[LogEntry]) -> Vec<String> {
    entries.iter().map(|e| e.to_string()).collect()
}
