// Certificate Acquisition Analytics - Core Library
// Exposes all modules for use in the CLI and tests

pub mod store;
pub mod sample;
pub mod catalog;
pub mod search;
pub mod filter;
pub mod aggregate;

// Re-export commonly used types
pub use store::{
    AcquisitionRecord, DataFormatError, RecordStore, Vocabulary, REQUIRED_COLUMNS,
};
pub use sample::{generate, sample_store, SAMPLE_SEED, SAMPLE_SIZE};
pub use catalog::{
    CertificateCatalog, RegionAtlas, UnknownRegionError, NO_DESCRIPTION,
};
pub use search::parse_search;
pub use filter::{
    apply, FilterPredicate, FilterSnapshot, FilterState,
};
pub use aggregate::{
    AgeBracket, AgeBracketCount, AgeDistribution, AggregationEngine,
    CertificateCount, CertificateRanking, GenderBreakdown, GenderCount,
    OverviewSummary, RegionCount, RegionDistribution, YearCount, YearlyTrend,
    DEFAULT_TOP_N,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
