use crate::model::activity::LogEntry;
use crate::model::record::{Record, text_or_placeholder};
use crate::provider::{ElementHandle, ElementProvider};

/// Error type for scanning
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("no text elements to export")]
    Empty,
}

/// Records found by a scan, plus warnings for items that could not be read
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub records: Vec<Record>,
    pub warnings: Vec<LogEntry>,
}

impl ScanReport {
    /// The records, or `ScanError::Empty` when nothing text-bearing was found
    pub fn into_records(self) -> Result<Vec<Record>, ScanError> {
        if self.records.is_empty() {
            Err(ScanError::Empty)
        } else {
            Ok(self.records)
        }
    }
}

/// Snapshot every text-bearing element of every container.
///
/// Access failures are logged and the offending item or element skipped;
/// the scan itself never fails.
pub fn scan(provider: &dyn ElementProvider) -> ScanReport {
    let mut report = ScanReport::default();

    for item in 1..=provider.item_count() {
        let name = match provider.container_name(item) {
            Ok(Some(name)) => name,
            Ok(None) => continue,
            Err(err) => {
                report.warnings.push(LogEntry::warning(format!(
                    "Cannot access project item {}: {}",
                    item, err
                )));
                continue;
            }
        };
        let count = match provider.element_count(item) {
            Ok(count) => count,
            Err(err) => {
                report.warnings.push(LogEntry::warning(format!(
                    "Cannot access elements of container {}: {}",
                    name, err
                )));
                continue;
            }
        };

        for index in 1..=count {
            let handle = ElementHandle::new(item, index);
            let element_name = match provider.element_name(handle) {
                Ok(n) => n,
                Err(err) => {
                    report.warnings.push(LogEntry::warning(format!(
                        "Cannot access element {} in container {}: {}",
                        index, name, err
                    )));
                    continue;
                }
            };
            match provider.text_property(handle) {
                Ok(Some(state)) => report.records.push(Record::new(
                    name.clone(),
                    index,
                    element_name,
                    text_or_placeholder(state.value.as_deref()),
                )),
                Ok(None) => {}
                Err(err) => report.warnings.push(LogEntry::warning(format!(
                    "Error processing element '{}' in {}: {}",
                    element_name, name, err
                ))),
            }
        }
    }

    tracing::debug!(
        records = report.records.len(),
        warnings = report.warnings.len(),
        "scan finished"
    );
    report
}
