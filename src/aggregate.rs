// 📊 Aggregation Engine - grouped counts behind the dashboard views
// Every operation is a pure function over a record slice: exact integer
// tallies, repeatable results, well-defined output on empty input.

use crate::catalog::{CertificateCatalog, RegionAtlas, UnknownRegionError};
use crate::store::AcquisitionRecord;
use serde::{Deserialize, Serialize};

/// Ranking length used when the caller does not ask for one.
pub const DEFAULT_TOP_N: usize = 5;

const GENDER_MALE: &str = "남성";
const GENDER_FEMALE: &str = "여성";

// ============================================================================
// AGE BRACKETS
// ============================================================================

/// Age grouping used by the age distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    Twenties,
    Thirties,
    FortyPlus,
}

impl AgeBracket {
    pub fn of(age: u32) -> Self {
        match age {
            0..=29 => AgeBracket::Twenties,
            30..=39 => AgeBracket::Thirties,
            _ => AgeBracket::FortyPlus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Twenties => "20s",
            AgeBracket::Thirties => "30s",
            AgeBracket::FortyPlus => "40+",
        }
    }

    /// Korean display label, used in captions.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::Twenties => "20대",
            AgeBracket::Thirties => "30대",
            AgeBracket::FortyPlus => "40대 이상",
        }
    }
}

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Acquisition counts per year, ascending, with the busiest year singled out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyTrend {
    pub rows: Vec<YearCount>,
    /// Highest count; ties go to the earliest year.
    pub peak: Option<YearCount>,
    pub total: usize,
}

impl YearlyTrend {
    pub fn summary(&self) -> String {
        match &self.peak {
            Some(peak) => format!("{}년에 {}명이 취득했습니다.", peak.year, peak.count),
            None => "취득 기록이 없습니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender: String,
    pub count: usize,
}

/// Acquisition counts per gender, most common first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderBreakdown {
    pub rows: Vec<GenderCount>,
    pub total: usize,
    /// Percentage of records with gender 여성, one decimal. 0.0 when empty.
    pub female_share: f64,
}

impl GenderBreakdown {
    pub fn summary(&self) -> String {
        format!("여성 비율은 {:.1}% 입니다.", self.female_share)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Acquisition counts per region, most common first, with map coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDistribution {
    pub rows: Vec<RegionCount>,
    pub total: usize,
}

impl RegionDistribution {
    pub fn top_region(&self) -> Option<&RegionCount> {
        self.rows.first()
    }

    pub fn summary(&self) -> String {
        match self.top_region() {
            Some(top) => format!("가장 많은 취득 지역은 {}입니다.", top.region),
            None => "취득 기록이 없습니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBracketCount {
    pub bracket: AgeBracket,
    pub count: usize,
}

/// Acquisition counts per age bracket, most common first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub rows: Vec<AgeBracketCount>,
    pub total: usize,
}

impl AgeDistribution {
    pub fn summary(&self) -> String {
        match self.rows.first() {
            Some(top) => format!("가장 많은 연령대는 {}입니다.", top.bracket.label()),
            None => "취득 기록이 없습니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateCount {
    pub certificate_type: String,
    pub count: usize,
    pub description: String,
}

/// The `top_n` most acquired certificates, optionally within a single year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRanking {
    pub rows: Vec<CertificateCount>,
    /// Year restriction the ranking was computed under, if any.
    pub year: Option<i32>,
    /// Records considered after the year restriction.
    pub total: usize,
}

impl CertificateRanking {
    pub fn summary(&self) -> String {
        match self.rows.first() {
            Some(top) => format!("가장 인기 있는 자격증은 {}입니다.", top.certificate_type),
            None => "취득 기록이 없습니다.".to_string(),
        }
    }
}

/// Headline numbers for the metric cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub top_region: Option<String>,
}

impl OverviewSummary {
    pub fn summary(&self) -> String {
        format!(
            "전체 취득자 {}명, 남 {} / 여 {}, 최다 지역 {}",
            self.total,
            self.male,
            self.female,
            self.top_region.as_deref().unwrap_or("-")
        )
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Computes the grouped views. Owns the static catalogs so every ranking
/// and map row carries its description or coordinates.
pub struct AggregationEngine {
    catalog: CertificateCatalog,
    atlas: RegionAtlas,
}

impl AggregationEngine {
    pub fn new() -> Self {
        AggregationEngine {
            catalog: CertificateCatalog::with_defaults(),
            atlas: RegionAtlas::with_defaults(),
        }
    }

    /// Counts per acquisition year, ascending.
    pub fn count_by_year(&self, records: &[AcquisitionRecord]) -> YearlyTrend {
        let mut rows: Vec<YearCount> = tally_ordered(records.iter().map(|r| r.year))
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect();
        rows.sort_by_key(|row| row.year);

        // Strictly-greater comparison keeps the earliest year on a tie.
        let mut peak: Option<YearCount> = None;
        for row in &rows {
            let better = match &peak {
                Some(current) => row.count > current.count,
                None => true,
            };
            if better {
                peak = Some(row.clone());
            }
        }

        YearlyTrend {
            rows,
            peak,
            total: records.len(),
        }
    }

    /// Counts per gender, descending, with the female percentage share.
    pub fn count_by_gender(&self, records: &[AcquisitionRecord]) -> GenderBreakdown {
        let mut rows: Vec<GenderCount> = tally_ordered(records.iter().map(|r| r.gender.clone()))
            .into_iter()
            .map(|(gender, count)| GenderCount { gender, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));

        let total = records.len();
        let female = rows
            .iter()
            .find(|row| row.gender == GENDER_FEMALE)
            .map_or(0, |row| row.count);
        let female_share = if total == 0 {
            0.0
        } else {
            round_one_decimal(female as f64 / total as f64 * 100.0)
        };

        GenderBreakdown {
            rows,
            total,
            female_share,
        }
    }

    /// Counts per region, descending, each row carrying its centroid.
    ///
    /// A region without registered coordinates fails the whole aggregation.
    /// Dropping the row instead would make the map silently disagree with
    /// the bar counts.
    pub fn count_by_region(
        &self,
        records: &[AcquisitionRecord],
    ) -> Result<RegionDistribution, UnknownRegionError> {
        let mut tallies = tally_ordered(records.iter().map(|r| r.region.clone()));
        tallies.sort_by(|a, b| b.1.cmp(&a.1));

        let rows = tallies
            .into_iter()
            .map(|(region, count)| {
                let (latitude, longitude) = self.atlas.coordinates(&region)?;
                Ok(RegionCount {
                    region,
                    count,
                    latitude,
                    longitude,
                })
            })
            .collect::<Result<Vec<_>, UnknownRegionError>>()?;

        Ok(RegionDistribution {
            rows,
            total: records.len(),
        })
    }

    /// Counts per age bracket, descending.
    pub fn count_by_age_bracket(&self, records: &[AcquisitionRecord]) -> AgeDistribution {
        let mut rows: Vec<AgeBracketCount> =
            tally_ordered(records.iter().map(|r| AgeBracket::of(r.age)))
                .into_iter()
                .map(|(bracket, count)| AgeBracketCount { bracket, count })
                .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));

        AgeDistribution {
            rows,
            total: records.len(),
        }
    }

    /// The `top_n` most acquired certificate types, described from the
    /// catalog, optionally restricted to a single year first.
    pub fn top_certificates(
        &self,
        records: &[AcquisitionRecord],
        top_n: usize,
        year: Option<i32>,
    ) -> CertificateRanking {
        let considered: Vec<&AcquisitionRecord> = records
            .iter()
            .filter(|r| year.map_or(true, |y| r.year == y))
            .collect();

        let mut tallies = tally_ordered(considered.iter().map(|r| r.certificate_type.clone()));
        tallies.sort_by(|a, b| b.1.cmp(&a.1));
        tallies.truncate(top_n);

        let rows = tallies
            .into_iter()
            .map(|(certificate_type, count)| CertificateCount {
                description: self.catalog.describe(&certificate_type).to_string(),
                certificate_type,
                count,
            })
            .collect();

        CertificateRanking {
            rows,
            year,
            total: considered.len(),
        }
    }

    /// Headline numbers for the metric cards. The top region here needs no
    /// coordinates, so an atlas gap cannot fail the overview.
    pub fn overview(&self, records: &[AcquisitionRecord]) -> OverviewSummary {
        let mut regions = tally_ordered(records.iter().map(|r| r.region.as_str()));
        regions.sort_by(|a, b| b.1.cmp(&a.1));

        OverviewSummary {
            total: records.len(),
            male: records.iter().filter(|r| r.gender == GENDER_MALE).count(),
            female: records.iter().filter(|r| r.gender == GENDER_FEMALE).count(),
            top_region: regions.first().map(|(region, _)| region.to_string()),
        }
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Count occurrences, preserving first-encounter key order.
/// Count-descending orderings rely on this plus a stable sort for their
/// first-encountered tie rule.
fn tally_ordered<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match counts.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    counts
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================
