// 🔍 Free-Text Search - token classifier over the data vocabulary

use crate::filter::FilterPredicate;
use crate::store::Vocabulary;

/// Parse a free-text query into a filter predicate.
///
/// Rules:
/// - Tokens are whitespace-separated; empty or blank input parses to the
///   empty predicate (no constraints).
/// - Every token is checked against every dimension independently, so one
///   token may land in several dimensions (broad match).
/// - A token of ASCII digits is read as a year and kept only when that year
///   actually occurs in the data. Unknown years and integer overflow are
///   dropped silently.
/// - Gender, region, and certificate matches are exact and case-sensitive
///   against the observed vocabulary.
/// - Tokens matching nothing are ignored; a query never fails.
pub fn parse_search(query: &str, vocabulary: &Vocabulary) -> FilterPredicate {
    let mut predicate = FilterPredicate::default();

    for token in query.split_whitespace() {
        if is_ascii_digits(token) {
            if let Ok(year) = token.parse::<i32>() {
                if vocabulary.contains_year(year) {
                    predicate.years.push(year);
                }
            }
        }
        if vocabulary.contains_gender(token) {
            predicate.genders.push(token.to_string());
        }
        if vocabulary.contains_region(token) {
            predicate.regions.push(token.to_string());
        }
        if vocabulary.contains_certificate_type(token) {
            predicate.certificate_types.push(token.to_string());
        }
    }

    predicate
}

fn is_ascii_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

// ============================================================================
// TESTS
// ============================================================================
