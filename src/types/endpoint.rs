use std::collections::BTreeMap;

use geo::Point;

/// Values of the priority column that mark an endpoint as priority class.
pub const PRIORITY_TOKENS: [&str; 4] = ["netpark", "sim", "true", "1"];

/// True iff `value` (trimmed, case-insensitive) is one of [`PRIORITY_TOKENS`].
pub fn is_affirmative(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    PRIORITY_TOKENS.contains(&value.as_str())
}

/// A network access point read from a tabular dataset.
/// Deployed and prospective endpoints share this shape but live in separate collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub lat: f64,
    pub lng: f64,
    pub is_priority_class: bool,
    pub label: Option<String>,
    /// Every other non-empty column of the source row.
    pub attributes: BTreeMap<String, String>,
}

impl Endpoint {
    pub fn new(lat: f64, lng: f64, is_priority_class: bool) -> Self {
        Self { lat, lng, is_priority_class, label: None, attributes: BTreeMap::new() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Location as a geo point (x = lng, y = lat).
    #[inline] pub fn point(&self) -> Point<f64> { Point::new(self.lng, self.lat) }
}
