use std::fmt;

use geo::{Coord, MapCoords, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Source geographic CRS: WGS84 lon/lat, as read from boundary and point files.
const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Spherical lon/lat on the Web Mercator sphere. Pairing it with the sphere
/// below avoids a datum shift, which is how EPSG:3857 treats WGS84 degrees.
const SPHERE_PROJ4: &str = "+proj=longlat +a=6378137 +b=6378137 +no_defs +type=crs";
const WEB_MERCATOR_PROJ4: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs";

/// Planar coordinate system the grid is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Crs {
    /// EPSG:3857, metres at the equator.
    #[default]
    WebMercator,
    /// UTM zone picked from the centre of the data extent.
    Utm,
    /// Inputs are already planar; `lng` is x and `lat` is y.
    Planar,
}

/// Forward/inverse transform between geographic degrees and a planar CRS.
pub struct Projector {
    crs: Crs,
    transforms: Option<Transforms>,
    description: String,
}

struct Transforms {
    geographic: Proj4,
    planar: Proj4,
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("crs", &self.crs)
            .field("planar", &self.description)
            .finish()
    }
}

/// Build PROJ.4 string for the target UTM CRS, chosen from a lon/lat center.
fn utm_proj4(center: Coord<f64>) -> String {
    let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
    let south = if center.y >= 0.0 { "" } else { " +south" };
    format!("+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs")
}

fn build(proj_string: &str) -> Result<Proj4, EngineError> {
    Proj4::from_proj_string(proj_string)
        .map_err(|e| EngineError::Projection(format!("failed to build PROJ.4 {proj_string:?}: {e}")))
}

impl Projector {
    /// Identity projector for inputs that are already planar.
    pub fn identity() -> Self {
        Self { crs: Crs::Planar, transforms: None, description: "identity".into() }
    }

    /// Build a projector for `crs`. UTM needs the geographic `extent` of the
    /// data to pick its zone.
    pub fn new(crs: Crs, extent: Option<Rect<f64>>) -> Result<Self, EngineError> {
        let (geographic, planar) = match crs {
            Crs::Planar => return Ok(Self::identity()),
            Crs::WebMercator => (SPHERE_PROJ4.to_string(), WEB_MERCATOR_PROJ4.to_string()),
            Crs::Utm => {
                let extent = extent.ok_or_else(|| EngineError::InvalidConfiguration(
                    "utm projection needs a data extent to choose its zone".into()
                ))?;
                (WGS84_PROJ4.to_string(), utm_proj4(extent.center()))
            }
        };

        Ok(Self {
            crs,
            transforms: Some(Transforms { geographic: build(&geographic)?, planar: build(&planar)? }),
            description: planar,
        })
    }

    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Project a geometry from lon/lat degrees into the planar CRS.
    pub fn to_planar<G>(&self, geom: &G) -> Result<G::Output, EngineError>
    where G: MapCoords<f64, f64> {
        let Some(t) = &self.transforms else { return Ok(geom.map_coords(|c| c)) };
        geom.try_map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&t.geographic, &t.planar, &mut point)
                .map_err(|e| EngineError::Projection(format!("({}, {}) -> planar: {e}", coord.x, coord.y)))?;
            Ok(Coord { x: point.0, y: point.1 })
        })
    }

    /// Project a geometry from the planar CRS back into lon/lat degrees.
    pub fn to_geographic<G>(&self, geom: &G) -> Result<G::Output, EngineError>
    where G: MapCoords<f64, f64> {
        let Some(t) = &self.transforms else { return Ok(geom.map_coords(|c| c)) };
        geom.try_map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x, coord.y, 0.0);
            transform(&t.planar, &t.geographic, &mut point)
                .map_err(|e| EngineError::Projection(format!("({}, {}) -> geographic: {e}", coord.x, coord.y)))?;
            Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::{point, Point};

    use super::*;

    #[test]
    fn identity_passes_coordinates_through() {
        let projector = Projector::identity();
        let p = projector.to_planar(&point!(x: 12.5, y: -3.0)).unwrap();
        assert_eq!(p, point!(x: 12.5, y: -3.0));
        assert_eq!(projector.crs(), Crs::Planar);
    }

    #[test]
    fn web_mercator_matches_known_values() {
        let projector = Projector::new(Crs::WebMercator, None).unwrap();
        let origin = projector.to_planar(&point!(x: 0.0, y: 0.0)).unwrap();
        assert!(origin.x().abs() < 1e-6 && origin.y().abs() < 1e-6);

        let east: Point<f64> = projector.to_planar(&point!(x: 180.0, y: 0.0)).unwrap();
        assert!((east.x() - 20_037_508.342789244).abs() < 1e-3);
    }

    #[test]
    fn web_mercator_round_trips() {
        let projector = Projector::new(Crs::WebMercator, None).unwrap();
        let sao_paulo = point!(x: -46.655981, y: -23.561684);
        let back = projector.to_geographic(&projector.to_planar(&sao_paulo).unwrap()).unwrap();
        assert!((back.x() - sao_paulo.x()).abs() < 1e-9);
        assert!((back.y() - sao_paulo.y()).abs() < 1e-9);
    }

    #[test]
    fn utm_picks_southern_zone() {
        let extent = Rect::new(Coord { x: -46.7, y: -23.6 }, Coord { x: -46.6, y: -23.5 });
        assert_eq!(utm_proj4(extent.center()), "+proj=utm +zone=23 +south +datum=WGS84 +units=m +no_defs +type=crs");

        let projector = Projector::new(Crs::Utm, Some(extent)).unwrap();
        let p = projector.to_planar(&point!(x: -45.0, y: -23.5)).unwrap();
        // Central meridian of zone 23 maps to the false easting.
        assert!((p.x() - 500_000.0).abs() < 1e-3);
        assert!(p.y() > 7_000_000.0);
    }

    #[test]
    fn utm_without_extent_is_a_configuration_error() {
        assert!(matches!(Projector::new(Crs::Utm, None), Err(EngineError::InvalidConfiguration(_))));
    }
}
