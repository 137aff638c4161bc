use geo::{Area, BooleanOps, BoundingRect, Contains, Coord, CoordsIter, Intersects, MultiPolygon, Point, Rect, Validation};

use crate::error::EngineError;

/// Compute the union of all MultiPolygons into a single MultiPolygon.
/// Returns `None` when the input is empty. This may be slow for large numbers of complex polygons.
pub fn union<'a>(polygons: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<MultiPolygon<f64>> {
    polygons.into_iter().cloned().reduce(|a, b| a.union(&b))
}

/// True for any shared interior or boundary point.
#[inline]
pub fn intersects<A, B>(a: &A, b: &B) -> bool where A: Intersects<B> {
    a.intersects(b)
}

/// True iff `point` lies strictly inside `container`; boundary points are excluded.
#[inline]
pub fn contains(container: &MultiPolygon<f64>, point: &Point<f64>) -> bool {
    container.contains(point)
}

/// True iff `point` lies inside `container` or on its boundary.
#[inline]
pub fn covers(container: &MultiPolygon<f64>, point: &Point<f64>) -> bool {
    container.intersects(point)
}

/// Intersection of two areas, or `None` if they share no area.
pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let clipped = a.intersection(b);
    if clipped.0.is_empty() || clipped.unsigned_area() <= 0.0 { return None }
    Some(clipped)
}

/// Compute the bounding rectangle of all MultiPolygons.
pub fn bounds<'a>(polygons: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    polygons.into_iter()
        .filter_map(|polygon| polygon.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            }
        ))
}

/// Reject polygons the grid cannot be built from: empty, zero-area,
/// non-finite or self-intersecting.
pub fn validate_polygon(polygon: &MultiPolygon<f64>, what: &str) -> Result<(), EngineError> {
    if polygon.0.is_empty() {
        return Err(EngineError::InvalidGeometry(format!("{what} is empty")))
    }
    if polygon.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(EngineError::InvalidGeometry(format!("{what} has non-finite coordinates")))
    }
    if polygon.unsigned_area() <= 0.0 {
        return Err(EngineError::InvalidGeometry(format!("{what} has zero area")))
    }
    if !polygon.is_valid() {
        return Err(EngineError::InvalidGeometry(format!("{what} is self-intersecting or malformed")))
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use geo::{polygon, point};

    use super::*;

    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x, y }, Coord { x: x + side, y: y + side }).to_polygon()])
    }

    #[test]
    fn union_merges_adjacent_squares() {
        let merged = union(&[square(0.0, 0.0, 10.0), square(10.0, 0.0, 10.0)]).unwrap();
        assert!((merged.unsigned_area() - 200.0).abs() < 1e-9);
        assert_eq!(merged.0.len(), 1);
        assert!(union(std::iter::empty::<&MultiPolygon<f64>>()).is_none());
    }

    #[test]
    fn intersects_includes_shared_edges() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        let c = square(20.5, 0.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn contains_is_strict_and_covers_is_not() {
        let a = square(0.0, 0.0, 10.0);
        assert!(contains(&a, &point!(x: 5.0, y: 5.0)));
        assert!(!contains(&a, &point!(x: 10.0, y: 5.0)));
        assert!(covers(&a, &point!(x: 10.0, y: 5.0)));
        assert!(!covers(&a, &point!(x: 10.5, y: 5.0)));
    }

    #[test]
    fn intersection_of_touching_squares_is_none() {
        let a = square(0.0, 0.0, 10.0);
        assert!(intersection(&a, &square(10.0, 0.0, 10.0)).is_none());
        let overlap = intersection(&a, &square(5.0, 5.0, 10.0)).unwrap();
        assert!((overlap.unsigned_area() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn bounds_spans_all_inputs() {
        let rect = bounds(&[square(0.0, 0.0, 1.0), square(5.0, -3.0, 1.0)]).unwrap();
        assert_eq!(rect.min(), Coord { x: 0.0, y: -3.0 });
        assert_eq!(rect.max(), Coord { x: 6.0, y: 1.0 });
    }

    #[test]
    fn validate_rejects_bowtie() {
        let bowtie = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
        ]]);
        assert!(matches!(validate_polygon(&bowtie, "union"), Err(EngineError::InvalidGeometry(_))));
        assert!(validate_polygon(&square(0.0, 0.0, 1.0), "union").is_ok());
        assert!(validate_polygon(&MultiPolygon(vec![]), "union").is_err());
    }
}
