// 🎛️ Filter Engine - predicate application + session filter state
// Filtering never mutates the store; every application returns a fresh
// owned sequence for downstream aggregation.

use crate::search::parse_search;
use crate::store::{AcquisitionRecord, RecordStore, Vocabulary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PREDICATE
// ============================================================================

/// Inclusion lists for the four filterable dimensions.
///
/// An empty list places no constraint on its dimension. A record matches
/// when every constrained dimension contains its value: AND across
/// dimensions, OR within one. Duplicate values are harmless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub years: Vec<i32>,
    pub genders: Vec<String>,
    pub regions: Vec<String>,
    pub certificate_types: Vec<String>,
}

impl FilterPredicate {
    /// True when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.genders.is_empty()
            && self.regions.is_empty()
            && self.certificate_types.is_empty()
    }

    pub fn matches(&self, record: &AcquisitionRecord) -> bool {
        (self.years.is_empty() || self.years.contains(&record.year))
            && (self.genders.is_empty() || self.genders.iter().any(|g| *g == record.gender))
            && (self.regions.is_empty() || self.regions.iter().any(|r| *r == record.region))
            && (self.certificate_types.is_empty()
                || self
                    .certificate_types
                    .iter()
                    .any(|c| *c == record.certificate_type))
    }
}

/// Apply a predicate to the store, returning the matching records.
///
/// A predicate matching nothing yields an empty vec, not an error;
/// downstream aggregations all have well-defined empty results.
pub fn apply(store: &RecordStore, predicate: &FilterPredicate) -> Vec<AcquisitionRecord> {
    store
        .all()
        .iter()
        .filter(|record| predicate.matches(record))
        .cloned()
        .collect()
}

// ============================================================================
// SESSION FILTER STATE
// ============================================================================

/// The user's current selections: four multi-select lists plus the free
/// search text. Owned by the session that created it, nothing ambient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub years: Vec<i32>,
    pub genders: Vec<String>,
    pub regions: Vec<String>,
    pub certificate_types: Vec<String>,
    pub search: String,
}

/// A saved copy of the filter state, stamped at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub saved_at: DateTime<Utc>,
    pub state: FilterState,
}

impl FilterState {
    pub fn new() -> Self {
        FilterState::default()
    }

    /// Clear every selection and the search text.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    /// Capture the current selections for later restore.
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            saved_at: Utc::now(),
            state: self.clone(),
        }
    }

    /// Replace the current selections with a saved snapshot.
    pub fn restore(&mut self, snapshot: &FilterSnapshot) {
        *self = snapshot.state.clone();
    }

    /// Combine explicit selections with the parsed search text.
    ///
    /// The search text wins per dimension: a dimension the parser filled
    /// replaces the explicit selection for that dimension, while dimensions
    /// the parser left empty keep their explicit lists.
    pub fn resolve(&self, vocabulary: &Vocabulary) -> FilterPredicate {
        let parsed = parse_search(&self.search, vocabulary);

        FilterPredicate {
            years: if parsed.years.is_empty() {
                self.years.clone()
            } else {
                parsed.years
            },
            genders: if parsed.genders.is_empty() {
                self.genders.clone()
            } else {
                parsed.genders
            },
            regions: if parsed.regions.is_empty() {
                self.regions.clone()
            } else {
                parsed.regions
            },
            certificate_types: if parsed.certificate_types.is_empty() {
                self.certificate_types.clone()
            } else {
                parsed.certificate_types
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(year: i32, gender: &str, age: u32, region: &str, certificate: &str) -> AcquisitionRecord {
        AcquisitionRecord {
            year,
            gender: gender.to_string(),
            age,
            birth_year: year - age as i32,
            region: region.to_string(),
            certificate_type: certificate.to_string(),
            acquired_at: NaiveDate::from_ymd_opt(year, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    fn create_test_store() -> RecordStore {
        RecordStore::from_records(vec![
            record(2020, "여성", 27, "서울", "정보처리기사"),
            record(2020, "남성", 45, "서울", "전기기사"),
            record(2021, "남성", 34, "부산", "전기기사"),
            record(2021, "여성", 29, "대구", "건축기사"),
            record(2019, "남성", 52, "부산", "정보처리기사"),
        ])
    }

    #[test]
    fn test_empty_predicate_keeps_every_record() {
        let store = create_test_store();
        let result = apply(&store, &FilterPredicate::default());

        assert_eq!(result.len(), store.len());
    }

    #[test]
    fn test_or_within_a_dimension() {
        let store = create_test_store();
        let predicate = FilterPredicate {
            years: vec![2020, 2021],
            ..Default::default()
        };

        let result = apply(&store, &predicate);
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|r| r.year == 2020 || r.year == 2021));
    }

    #[test]
    fn test_and_across_dimensions() {
        let store = create_test_store();
        let predicate = FilterPredicate {
            years: vec![2020],
            regions: vec!["서울".to_string()],
            ..Default::default()
        };

        let result = apply(&store, &predicate);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.year == 2020 && r.region == "서울"));
    }

    #[test]
    fn test_no_match_yields_empty_not_error() {
        let store = create_test_store();
        let predicate = FilterPredicate {
            years: vec![1900],
            ..Default::default()
        };

        let result = apply(&store, &predicate);
        assert!(result.is_empty());
        // The store itself is untouched.
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_duplicate_values_in_list_are_harmless() {
        let store = create_test_store();
        let deduped = FilterPredicate {
            years: vec![2020],
            ..Default::default()
        };
        let duplicated = FilterPredicate {
            years: vec![2020, 2020],
            ..Default::default()
        };

        assert_eq!(apply(&store, &deduped), apply(&store, &duplicated));
    }

    #[test]
    fn test_reset_clears_all_selections() {
        let mut state = FilterState {
            years: vec![2020],
            genders: vec!["여성".to_string()],
            regions: vec!["서울".to_string()],
            certificate_types: vec!["전기기사".to_string()],
            search: "부산".to_string(),
        };

        state.reset();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut state = FilterState {
            years: vec![2020, 2021],
            regions: vec!["서울".to_string()],
            ..Default::default()
        };

        let saved = state.snapshot();
        assert!(saved.saved_at <= Utc::now());

        state.years = vec![1999];
        state.search = "남성".to_string();
        state.restore(&saved);

        assert_eq!(state.years, vec![2020, 2021]);
        assert_eq!(state.regions, vec!["서울"]);
        assert!(state.search.is_empty());
    }

    #[test]
    fn test_snapshot_survives_json_round_trip() {
        let state = FilterState {
            years: vec![2021],
            certificate_types: vec!["건축기사".to_string()],
            ..Default::default()
        };

        let saved = state.snapshot();
        let json = serde_json::to_string(&saved).unwrap();
        let loaded: FilterSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_resolve_search_overrides_explicit_selection() {
        let store = create_test_store();
        let state = FilterState {
            years: vec![2019],
            search: "2020".to_string(),
            ..Default::default()
        };

        let predicate = state.resolve(store.vocabulary());
        assert_eq!(predicate.years, vec![2020]);
    }

    #[test]
    fn test_resolve_keeps_explicit_selection_when_search_silent() {
        let store = create_test_store();
        let state = FilterState {
            regions: vec!["부산".to_string()],
            search: "2020".to_string(),
            ..Default::default()
        };

        let predicate = state.resolve(store.vocabulary());
        assert_eq!(predicate.years, vec![2020]);
        assert_eq!(predicate.regions, vec!["부산"]);
    }

    #[test]
    fn test_resolve_then_apply() {
        let store = create_test_store();
        let state = FilterState {
            search: "전기기사 남성".to_string(),
            ..Default::default()
        };

        let result = apply(&store, &state.resolve(store.vocabulary()));
        assert_eq!(result.len(), 2);
        assert!(result
            .iter()
            .all(|r| r.certificate_type == "전기기사" && r.gender == "남성"));
    }
}
