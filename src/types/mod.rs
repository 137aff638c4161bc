mod endpoint;
mod feature;

pub use endpoint::{is_affirmative, Endpoint, PRIORITY_TOKENS};
pub use feature::{normalize_label, BoundarySet, ExclusionZone, FeatureKind, Region};
