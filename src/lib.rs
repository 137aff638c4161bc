#![doc = "Coverage grid public API"]
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod geom;
pub mod grid;
pub mod io;
pub mod report;
pub mod stats;
pub mod types;

#[doc(inline)]
pub use classify::{Classification, GridCell};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use engine::{analyze, CoverageReport};

#[doc(inline)]
pub use error::{DataIntegrityWarning, EngineError};

#[doc(inline)]
pub use stats::RegionStatistics;

#[doc(inline)]
pub use types::{BoundarySet, Endpoint, ExclusionZone, Region};
