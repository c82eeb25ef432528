use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text stored for an element that has no real text value
pub const EMPTY_TEXT_PLACEHOLDER: &str = "(empty text)";

/// A snapshot of one text-bearing element.
///
/// `(container_name, element_index)` is the identity key. The element name
/// and the text are payload only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Name of the parent container
    #[serde(rename = "compName")]
    pub container_name: String,
    /// 1-based position of the element inside its container at scan time
    #[serde(rename = "layerIndex")]
    pub element_index: usize,
    /// Display label of the element
    #[serde(rename = "layerName")]
    pub element_name: String,
    /// Text content, or [`EMPTY_TEXT_PLACEHOLDER`]
    pub text: String,
}

impl Record {
    pub fn new(
        container_name: impl Into<String>,
        element_index: usize,
        element_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Record {
            container_name: container_name.into(),
            element_index,
            element_name: element_name.into(),
            text: text.into(),
        }
    }

    /// The identity key used for matching against live elements
    pub fn key(&self) -> (&str, usize) {
        (&self.container_name, self.element_index)
    }

    /// List formatting: `<elementName> [<elementIndex>] = <text>`
    pub fn display_line(&self) -> String {
        format!("{} [{}] = {}", self.element_name, self.element_index, self.text)
    }

    /// The display line on one row, line breaks shown as `\n`
    pub fn single_line(&self) -> String {
        self.display_line().replace('\r', "").replace('\n', "\\n")
    }
}

/// Map an optional live text value onto the stored representation
pub fn text_or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(EMPTY_TEXT_PLACEHOLDER)
}

/// The ordered set of records currently loaded.
///
/// Order is insertion order and only matters for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        RecordStore { records }
    }

    /// Replace the whole store (scan, file load, refresh)
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Overwrite the text of one record. Returns false if the index is out of range.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Record> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Remove every record of a container. Returns how many were removed.
    pub fn remove_container(&mut self, container_name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.container_name != container_name);
        before - self.records.len()
    }

    /// Position of the first record with the given identity key
    pub fn position_of(&self, container_name: &str, element_index: usize) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.key() == (container_name, element_index))
    }

    /// Record indices grouped by container, in first-seen container order
    pub fn group_by_container(&self) -> IndexMap<&str, Vec<usize>> {
        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (i, record) in self.records.iter().enumerate() {
            groups
                .entry(record.container_name.as_str())
                .or_default()
                .push(i);
        }
        groups
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        RecordStore::from_records(records)
    }
}
