// 🎲 Sample Dataset - deterministic synthetic fallback records
// Stands in for real input when no file is supplied. Fixed seed, so every
// run of the same size produces byte-identical records.

use crate::catalog::{CertificateCatalog, RegionAtlas};
use crate::store::{AcquisitionRecord, RecordStore};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_SEED: u64 = 42;
pub const SAMPLE_SIZE: usize = 500;

const SAMPLE_YEARS: std::ops::RangeInclusive<i32> = 1993..=2025;
const SAMPLE_AGES: std::ops::RangeInclusive<u32> = 20..=60;
const SAMPLE_GENDERS: &[&str] = &["남성", "여성"];

/// Generate `n` synthetic acquisition records.
///
/// Categorical values are drawn from the shipped catalogs so the generated
/// vocabulary always matches the description and coordinate tables.
pub fn generate(n: usize) -> Vec<AcquisitionRecord> {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);

    let regions = RegionAtlas::with_defaults().names();
    let certificates = CertificateCatalog::with_defaults().names();

    (0..n)
        .map(|_| {
            let year = rng.gen_range(SAMPLE_YEARS);
            let gender = SAMPLE_GENDERS[rng.gen_range(0..SAMPLE_GENDERS.len())];
            let age = rng.gen_range(SAMPLE_AGES);
            let region = regions[rng.gen_range(0..regions.len())];
            let certificate = certificates[rng.gen_range(0..certificates.len())];

            // Offset stays below 365, so the date never leaves `year`.
            let day_offset = rng.gen_range(0..365i64);
            // Jan 1 exists for every representable year.
            let acquired_at = NaiveDate::from_ymd_opt(year, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + Duration::days(day_offset);

            AcquisitionRecord {
                year,
                gender: gender.to_string(),
                age,
                birth_year: year - age as i32,
                region: region.to_string(),
                certificate_type: certificate.to_string(),
                acquired_at,
            }
        })
        .collect()
}

/// The default fallback store: [`SAMPLE_SIZE`] generated records.
pub fn sample_store() -> RecordStore {
    RecordStore::from_records(generate(SAMPLE_SIZE))
}

// ============================================================================
// TESTS
// ============================================================================
