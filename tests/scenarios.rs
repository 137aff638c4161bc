use covergrid::{
    analyze,
    config::GridConfig,
    geom::Crs,
    types::{BoundarySet, Endpoint},
    Classification, CoverageReport,
};
use geo::{Area, BooleanOps, Coord, MultiPolygon, Rect};

const STEP: f64 = 200.0;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }).to_polygon()])
}

/// Planar coordinates: `lat` is y, `lng` is x.
fn at(x: f64, y: f64, priority: bool) -> Endpoint {
    Endpoint::new(y, x, priority)
}

fn run(features: Vec<(&str, MultiPolygon<f64>)>, endpoints: Vec<Endpoint>) -> CoverageReport {
    let features: Vec<_> = features.into_iter()
        .map(|(label, shape)| (Some(label.to_string()), shape))
        .collect();
    let boundaries = BoundarySet::from_features("scenario", features, "ZM");
    analyze(&GridConfig { step: STEP, projection: Crs::Planar }, boundaries, endpoints, vec![]).unwrap()
}

fn region() -> (&'static str, MultiPolygon<f64>) {
    ("Centro", square(0.0, 0.0, 400.0, 400.0))
}

#[test]
fn scenario_a_empty_region() {
    let report = run(vec![region()], vec![]);
    let stats = &report.statistics[0];

    assert_eq!(stats.total_cells, 4);
    assert!(report.cells().all(|c| c.classification == Classification::Empty && !c.resilient));
    assert_eq!(stats.valid_cells, 4);
    assert_eq!(stats.coverage_ratio(), 0);
}

#[test]
fn scenario_b_single_ordinary_endpoint() {
    let report = run(vec![region()], vec![at(100.0, 100.0, false)]);
    let stats = &report.statistics[0];

    let covered = report.cells().filter(|c| c.classification == Classification::HasEndpoint).collect::<Vec<_>>();
    assert_eq!(covered.len(), 1);
    assert!(!covered[0].is_resilience_zone());
    assert_eq!(stats.coverage_ratio(), 25);
    assert_eq!(stats.resilience_ratio(), 0);
}

#[test]
fn scenario_c_single_priority_endpoint() {
    let report = run(vec![region()], vec![at(100.0, 100.0, true)]);
    let stats = &report.statistics[0];

    let covered = report.cells().filter(|c| c.classification == Classification::HasEndpoint).collect::<Vec<_>>();
    assert_eq!(covered.len(), 1);
    assert!(covered[0].is_resilience_zone());
    assert_eq!(stats.resilience_ratio(), 25);
}

#[test]
fn scenario_d_region_fully_excluded() {
    let report = run(vec![region(), ("ZM Centro", square(-10.0, -10.0, 410.0, 410.0))], vec![]);
    let stats = &report.statistics[0];

    assert!(report.cells().all(|c| c.classification == Classification::DeadZone));
    assert_eq!(stats.dead_zone_cells, 4);
    assert_eq!(stats.valid_cells, 0);
    assert_eq!(stats.coverage_ratio(), 0);
    assert_eq!(stats.resilience_ratio(), 0);
}

#[test]
fn scenario_e_endpoint_overrides_exclusion() {
    let report = run(
        vec![region(), ("ZM", square(50.0, 50.0, 150.0, 150.0))],
        vec![at(120.0, 120.0, false)],
    );
    let stats = &report.statistics[0];

    assert_eq!(report.cells_of(0)[0].classification, Classification::HasEndpoint);
    assert_eq!(stats.dead_zone_cells, 0);
    assert_eq!(stats.valid_cells, 4);
    assert_eq!(stats.cells_with_endpoint, 1);
}

#[test]
fn multiple_endpoints_make_a_resilience_zone() {
    let report = run(vec![region()], vec![at(10.0, 10.0, false), at(20.0, 20.0, false), at(300.0, 300.0, false)]);
    let stats = &report.statistics[0];

    assert_eq!(stats.cells_with_endpoint, 2);
    assert_eq!(stats.resilience_cells, 1);
    assert_eq!(stats.total_endpoints, 3);
    assert!(report.cells_of(0)[0].is_resilience_zone());
}

#[test]
fn cells_tile_the_union_without_overlap() {
    // L-shaped pair of regions with an off-grid edge.
    let report = run(vec![
        ("Norte", square(0.0, 0.0, 530.0, 250.0)),
        ("Sul", square(0.0, 250.0, 250.0, 610.0)),
    ], vec![]);

    let union = square(0.0, 0.0, 530.0, 250.0).union(&square(0.0, 250.0, 250.0, 610.0));
    let tiles = report.grid.tiles();
    let total = tiles.iter().map(|t| t.planar.unsigned_area()).sum::<f64>();
    assert!((total - union.unsigned_area()).abs() < 1e-6);

    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            assert!(a.planar.intersection(&b.planar).unsigned_area() < 1e-9);
        }
    }
}

#[test]
fn counts_are_consistent() {
    let report = run(vec![
        ("A", square(0.0, 0.0, 600.0, 400.0)),
        ("B", square(600.0, 0.0, 1000.0, 400.0)),
        ("ZM 1", square(350.0, 50.0, 700.0, 150.0)),
    ], vec![at(100.0, 100.0, false), at(450.0, 100.0, true), at(900.0, 300.0, false), at(950.0, 350.0, false)]);

    for stats in &report.statistics {
        assert_eq!(stats.valid_cells + stats.dead_zone_cells, stats.total_cells);
        assert!(stats.resilience_cells <= stats.cells_with_endpoint);
        assert!(stats.coverage_ratio() <= 100);
    }
    for (region, cells) in report.classified.iter().enumerate() {
        let ids = cells.cells.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, (1..=ids.len() as u32).collect::<Vec<_>>());
        assert!(cells.cells.iter().all(|c| c.region == region));
    }
}

#[test]
fn runs_are_idempotent() {
    let input = || (
        vec![region(), ("ZM", square(210.0, 210.0, 260.0, 260.0))],
        vec![at(100.0, 100.0, true), at(300.0, 100.0, false)],
    );
    let (features, endpoints) = input();
    let first = run(features, endpoints);
    let (features, endpoints) = input();
    let second = run(features, endpoints);

    assert_eq!(first.statistics, second.statistics);
    assert_eq!(first.classified.len(), second.classified.len());
    for (a, b) in first.classified.iter().zip(&second.classified) {
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.endpoints, b.endpoints);
    }
}
