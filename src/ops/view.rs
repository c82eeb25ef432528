use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::record::{Record, RecordStore};
use crate::ops::matcher::resolve_record;
use crate::provider::ElementProvider;

/// Which records the list shows when no search is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    #[serde(rename = "all")]
    ShowAll,
    #[default]
    #[serde(rename = "exclude-expressions")]
    ExcludeExpressionDriven,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::ShowAll => "Show all",
            FilterMode::ExcludeExpressionDriven => "Exclude expression-driven",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FilterMode::ShowAll => FilterMode::ExcludeExpressionDriven,
            FilterMode::ExcludeExpressionDriven => FilterMode::ShowAll,
        }
    }
}

/// Compile a search query into a case-insensitive literal matcher.
/// Returns `None` for an empty query.
pub fn search_regex(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(query))).ok()
}

/// Whether a record's display line contains the query, ignoring case
pub fn matches_query(record: &Record, re: &Regex) -> bool {
    re.is_match(&record.display_line())
}

/// Byte ranges of query matches inside a display line
pub fn match_spans(line: &str, re: &Regex) -> Vec<Range<usize>> {
    re.find_iter(line).map(|m| m.start()..m.end()).collect()
}

/// Whether a record passes the filter mode.
///
/// Under `ExcludeExpressionDriven` only records whose live element resolves
/// and is expression-driven are dropped; anything unresolvable stays.
pub fn passes_filter(provider: &dyn ElementProvider, record: &Record, mode: FilterMode) -> bool {
    match mode {
        FilterMode::ShowAll => true,
        FilterMode::ExcludeExpressionDriven => {
            let Ok(handle) = resolve_record(provider, record) else {
                return true;
            };
            match provider.text_property(handle) {
                Ok(Some(state)) => !state.expression_driven,
                _ => true,
            }
        }
    }
}

/// Derive the visible subset of the store as indices, in store order.
///
/// A non-empty query searches every record and ignores the filter mode,
/// unless `combine` is set, in which case both must pass.
pub fn filtered_view(
    store: &RecordStore,
    provider: &dyn ElementProvider,
    mode: FilterMode,
    query: &str,
    combine: bool,
) -> Vec<usize> {
    let re = search_regex(query);
    store
        .iter()
        .enumerate()
        .filter(|(_, record)| match &re {
            Some(re) => {
                matches_query(record, re) && (!combine || passes_filter(provider, record, mode))
            }
            None => passes_filter(provider, record, mode),
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{FaultyProvider, sample_provider};
    use pretty_assertions::assert_eq;

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            Record::new("Scene1", 2, "Title", "Introduction"),
            Record::new("Scene1", 4, "Clock", "12:00"),
            Record::new("Scene1", 99, "Ghost", "gone"),
            Record::new("Missing", 1, "Clock", "elsewhere"),
            Record::new("Outro", 1, "Credits", "Thanks"),
        ])
    }

    #[test]
    fn query_matches_display_string_case_insensitively() {
        let re = search_regex("intro").unwrap();
        let record = Record::new("Scene1", 2, "Title", "Introduction");
        assert!(matches_query(&record, &re));
        // Matches on the index part of the display line too
        assert!(matches_query(&record, &search_regex("[2]").unwrap()));
        assert!(!matches_query(&record, &search_regex("outro").unwrap()));
    }

    #[test]
    fn query_is_literal() {
        let re = search_regex("a.b").unwrap();
        assert!(!matches_query(&Record::new("C", 1, "axb", "t"), &re));
        assert!(matches_query(&Record::new("C", 1, "a.b", "t"), &re));
    }

    #[test]
    fn empty_query_has_no_regex() {
        assert!(search_regex("").is_none());
    }

    #[test]
    fn show_all_keeps_everything() {
        let p = sample_provider();
        let view = filtered_view(&sample_store(), &p, FilterMode::ShowAll, "", false);
        assert_eq!(view, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn exclude_expressions_is_fail_open() {
        let p = sample_provider();
        let view = filtered_view(
            &sample_store(),
            &p,
            FilterMode::ExcludeExpressionDriven,
            "",
            false,
        );
        // Only the resolvable expression-driven Clock is dropped
        assert_eq!(view, vec![0, 2, 3, 4]);
    }

    #[test]
    fn provider_fault_does_not_exclude() {
        let mut p = FaultyProvider::new(sample_provider());
        p.broken_reads
            .insert(crate::provider::ElementHandle::new(2, 4));
        let record = Record::new("Scene1", 4, "Clock", "12:00");
        assert!(passes_filter(&p, &record, FilterMode::ExcludeExpressionDriven));
    }

    #[test]
    fn search_ignores_filter_mode_by_default() {
        let p = sample_provider();
        let view = filtered_view(
            &sample_store(),
            &p,
            FilterMode::ExcludeExpressionDriven,
            "clock",
            false,
        );
        assert_eq!(view, vec![1, 3]);
    }

    #[test]
    fn combined_search_applies_filter() {
        let p = sample_provider();
        let view = filtered_view(
            &sample_store(),
            &p,
            FilterMode::ExcludeExpressionDriven,
            "clock",
            true,
        );
        assert_eq!(view, vec![3]);
    }

    #[test]
    fn match_spans_for_highlighting() {
        let re = search_regex("tit").unwrap();
        assert_eq!(match_spans("Title [1] = title", &re), vec![0..3, 12..15]);
    }

    #[test]
    fn filter_mode_serde_names() {
        let mode: FilterMode = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(mode, FilterMode::ShowAll);
        assert_eq!(
            serde_json::to_string(&FilterMode::ExcludeExpressionDriven).unwrap(),
            "\"exclude-expressions\""
        );
    }
}
