use std::sync::LazyLock;

use ahash::AHashSet;
use geo::{MultiPolygon, Rect};
use regex::Regex;

use crate::{error::{DataIntegrityWarning, DropReason, EngineError}, geom};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Trim, collapse whitespace runs, lowercase.
pub fn normalize_label(label: &str) -> String {
    WHITESPACE.replace_all(label.trim(), " ").to_lowercase()
}

/// What a labelled boundary feature represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Region,
    ExclusionZone,
}

impl FeatureKind {
    /// A feature is an exclusion zone iff its normalized label starts with the normalized prefix.
    pub fn classify(label: &str, exclusion_prefix: &str) -> Self {
        if normalize_label(label).starts_with(&normalize_label(exclusion_prefix)) {
            FeatureKind::ExclusionZone
        } else {
            FeatureKind::Region
        }
    }
}

/// A named area whose coverage is measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

/// A named area where no coverage is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionZone {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

/// Boundary features split into regions and exclusion zones, in file order.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    pub regions: Vec<Region>,
    pub exclusion_zones: Vec<ExclusionZone>,
    pub warnings: Vec<DataIntegrityWarning>,
}

impl BoundarySet {
    /// Split `(label, geometry)` pairs by label. Unlabelled features are dropped and counted.
    pub fn from_features<I>(source: &str, features: I, exclusion_prefix: &str) -> Self
    where I: IntoIterator<Item = (Option<String>, MultiPolygon<f64>)> {
        let mut set = Self::default();
        let mut unlabelled = 0;

        for (label, boundary) in features {
            let Some(name) = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) else {
                unlabelled += 1;
                continue
            };
            match FeatureKind::classify(&name, exclusion_prefix) {
                FeatureKind::Region => set.regions.push(Region { name, boundary }),
                FeatureKind::ExclusionZone => set.exclusion_zones.push(ExclusionZone { name, boundary }),
            }
        }

        if unlabelled > 0 {
            set.warnings.push(DataIntegrityWarning::new(source, DropReason::MissingLabel, unlabelled));
        }
        set
    }

    /// Region names must be unique once normalized.
    pub fn check_unique_names(&self) -> Result<(), EngineError> {
        let mut seen = AHashSet::with_capacity(self.regions.len());
        for region in &self.regions {
            if !seen.insert(normalize_label(&region.name)) {
                return Err(EngineError::DuplicateRegion(region.name.clone()))
            }
        }
        Ok(())
    }

    /// Bounding box of every region and exclusion zone.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        geom::bounds(
            self.regions.iter().map(|r| &r.boundary)
                .chain(self.exclusion_zones.iter().map(|z| &z.boundary))
        )
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect};

    use super::*;

    fn unit() -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }).to_polygon()])
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_label("  Vila   Mariana\t"), "vila mariana");
        assert_eq!(normalize_label("ZM"), "zm");
    }

    #[test]
    fn classify_uses_case_insensitive_prefix() {
        assert_eq!(FeatureKind::classify("ZM", "ZM"), FeatureKind::ExclusionZone);
        assert_eq!(FeatureKind::classify(" zm parque", "ZM"), FeatureKind::ExclusionZone);
        assert_eq!(FeatureKind::classify("Zm-02", "zm"), FeatureKind::ExclusionZone);
        assert_eq!(FeatureKind::classify("Pinheiros", "ZM"), FeatureKind::Region);
        assert_eq!(FeatureKind::classify("Azm", "ZM"), FeatureKind::Region);
    }

    #[test]
    fn from_features_splits_and_counts_unlabelled() {
        let set = BoundarySet::from_features("test.geojson", vec![
            (Some("Pinheiros".into()), unit()),
            (Some("ZM".into()), unit()),
            (None, unit()),
            (Some("   ".into()), unit()),
            (Some(" Moema ".into()), unit()),
        ], "ZM");

        let names = set.regions.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Pinheiros", "Moema"]);
        assert_eq!(set.exclusion_zones.len(), 1);
        assert_eq!(set.warnings, vec![DataIntegrityWarning::new("test.geojson", DropReason::MissingLabel, 2)]);
    }

    #[test]
    fn duplicate_names_are_rejected_after_normalization() {
        let set = BoundarySet::from_features("x", vec![
            (Some("Vila  Mariana".into()), unit()),
            (Some("vila mariana".into()), unit()),
        ], "ZM");
        assert_eq!(set.check_unique_names(), Err(EngineError::DuplicateRegion("vila mariana".into())));
    }
}
