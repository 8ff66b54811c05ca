// 🗺️ Static Catalogs - certificate descriptions and region coordinates
// Configuration data owned by the core; kept in sync with the dataset vocabulary.

use std::collections::HashMap;

// ============================================================================
// DEFAULT TABLES
// ============================================================================

/// Certificate name → human-readable description.
/// Keys match the `certificate_type` values shipped in the dataset.
const CERTIFICATE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("정보처리기사", "IT 시스템 개발 및 운영 능력 인증"),
    ("전기기사", "전기 설계 및 시공 전문가"),
    ("건축기사", "건축 설계·감리 기술자"),
    ("토목기사", "토목 구조물 설계 및 관리"),
    ("기계기사", "기계 설계·제작 능력 인증"),
    ("산업안전기사", "산업현장 안전관리 전문가"),
    ("화공기사", "화학공정 운영·관리 능력"),
    ("환경기사", "환경오염 방지 기술자"),
    ("통신기사", "통신 시스템 설계·운영"),
    ("소방설비기사", "소방 설비 설계·시공 전문가"),
];

/// Fallback shown for certificate types missing from the catalog.
pub const NO_DESCRIPTION: &str = "설명 없음";

/// Region name → centroid (latitude, longitude), all 17 administrative regions.
const REGION_COORDINATES: &[(&str, f64, f64)] = &[
    ("서울", 37.5665, 126.9780),
    ("부산", 35.1796, 129.0756),
    ("대구", 35.8714, 128.6014),
    ("인천", 37.4563, 126.7052),
    ("광주", 35.1595, 126.8526),
    ("대전", 36.3504, 127.3845),
    ("울산", 35.5384, 129.3114),
    ("세종", 36.4800, 127.2890),
    ("경기", 37.2636, 127.0286),
    ("강원", 37.8228, 128.1555),
    ("충북", 36.6357, 127.4912),
    ("충남", 36.6588, 126.6728),
    ("전북", 35.8174, 127.1530),
    ("전남", 34.8161, 126.4630),
    ("경북", 36.4919, 128.8889),
    ("경남", 35.2383, 128.6917),
    ("제주", 33.4996, 126.5312),
];

// ============================================================================
// CERTIFICATE CATALOG
// ============================================================================

/// Lookup table of certificate descriptions.
///
/// Unknown certificate names resolve to [`NO_DESCRIPTION`] rather than an
/// error: the dataset vocabulary is data-derived and may outgrow the catalog.
pub struct CertificateCatalog {
    entries: HashMap<&'static str, &'static str>,
}

impl CertificateCatalog {
    /// Create the catalog with the shipped certificate descriptions.
    pub fn with_defaults() -> Self {
        CertificateCatalog {
            entries: CERTIFICATE_DESCRIPTIONS.iter().copied().collect(),
        }
    }

    /// Description for a certificate name, or the sentinel when unknown.
    pub fn describe(&self, certificate: &str) -> &'static str {
        self.entries.get(certificate).copied().unwrap_or(NO_DESCRIPTION)
    }

    /// Whether the catalog carries a description for this name.
    pub fn contains(&self, certificate: &str) -> bool {
        self.entries.contains_key(certificate)
    }

    /// Certificate names in catalog order.
    pub fn names(&self) -> Vec<&'static str> {
        CERTIFICATE_DESCRIPTIONS.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CertificateCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// REGION ATLAS
// ============================================================================

/// Error raised when a region has no registered centroid.
///
/// The region vocabulary is closed: every observed `region` value must be a
/// key of the atlas. Hitting this error means the static table and the
/// dataset have drifted apart, so it is surfaced instead of dropping the
/// region from map aggregations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegionError {
    pub region: String,
}

impl std::fmt::Display for UnknownRegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no coordinates registered for region '{}'; the region atlas must cover every observed region",
            self.region
        )
    }
}

impl std::error::Error for UnknownRegionError {}

/// Lookup table of region centroid coordinates.
pub struct RegionAtlas {
    coordinates: HashMap<&'static str, (f64, f64)>,
}

impl RegionAtlas {
    /// Create the atlas with the 17 shipped region centroids.
    pub fn with_defaults() -> Self {
        RegionAtlas {
            coordinates: REGION_COORDINATES
                .iter()
                .map(|(name, lat, lon)| (*name, (*lat, *lon)))
                .collect(),
        }
    }

    /// Centroid (latitude, longitude) for a region.
    pub fn coordinates(&self, region: &str) -> Result<(f64, f64), UnknownRegionError> {
        self.coordinates
            .get(region)
            .copied()
            .ok_or_else(|| UnknownRegionError {
                region: region.to_string(),
            })
    }

    /// Region names in atlas order.
    pub fn names(&self) -> Vec<&'static str> {
        REGION_COORDINATES.iter().map(|(name, _, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

impl Default for RegionAtlas {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_describes_known_certificates() {
        let catalog = CertificateCatalog::with_defaults();

        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.describe("정보처리기사"), "IT 시스템 개발 및 운영 능력 인증");
        assert_eq!(catalog.describe("소방설비기사"), "소방 설비 설계·시공 전문가");
        assert!(catalog.contains("전기기사"));
    }

    #[test]
    fn test_catalog_unknown_certificate_gets_sentinel() {
        let catalog = CertificateCatalog::with_defaults();

        assert_eq!(catalog.describe("잠수기능사"), NO_DESCRIPTION);
        assert!(!catalog.contains("잠수기능사"));
    }

    #[test]
    fn test_catalog_names_keep_table_order() {
        let catalog = CertificateCatalog::with_defaults();
        let names = catalog.names();

        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "정보처리기사");
        assert_eq!(names[9], "소방설비기사");
    }

    #[test]
    fn test_atlas_covers_all_seventeen_regions() {
        let atlas = RegionAtlas::with_defaults();

        assert_eq!(atlas.len(), 17);
        for region in atlas.names() {
            assert!(atlas.coordinates(region).is_ok());
        }
    }

    #[test]
    fn test_atlas_known_coordinates() {
        let atlas = RegionAtlas::with_defaults();

        assert_eq!(atlas.coordinates("서울").unwrap(), (37.5665, 126.9780));
        assert_eq!(atlas.coordinates("제주").unwrap(), (33.4996, 126.5312));
    }

    #[test]
    fn test_atlas_unknown_region_is_an_error() {
        let atlas = RegionAtlas::with_defaults();

        let err = atlas.coordinates("독도").unwrap_err();
        assert_eq!(err.region, "독도");
        assert!(err.to_string().contains("독도"));
    }
}
