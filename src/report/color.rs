//! Map palette.

use std::fmt;

use crate::classify::Classification;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const DEAD_ZONE: Rgb = Rgb::new(0x66, 0x66, 0x66);
pub const HAS_ENDPOINT: Rgb = Rgb::new(0x66, 0xcc, 0x66);
pub const REGION_OUTLINE: Rgb = Rgb::new(0xff, 0xa5, 0x00);
pub const ZONE_OUTLINE: Rgb = Rgb::new(0x00, 0x00, 0x00);
pub const CELL_OUTLINE: Rgb = Rgb::new(0x36, 0x36, 0x36);
pub const CELL_LABEL: Rgb = Rgb::new(0x36, 0x36, 0x36);
pub const PRIORITY_ENDPOINT: Rgb = Rgb::new(0x00, 0x00, 0x80);
pub const ENDPOINT: Rgb = Rgb::new(0x00, 0x80, 0x00);
pub const PROSPECTIVE_ENDPOINT: Rgb = Rgb::new(0x80, 0x00, 0x80);

/// Cell fill; empty cells are left unfilled.
pub fn cell_fill(classification: Classification) -> Option<Rgb> {
    match classification {
        Classification::Empty => None,
        Classification::HasEndpoint => Some(HAS_ENDPOINT),
        Classification::DeadZone => Some(DEAD_ZONE),
    }
}

/// Marker color for an endpoint.
#[inline]
pub fn endpoint_color(is_priority_class: bool) -> Rgb {
    if is_priority_class { PRIORITY_ENDPOINT } else { ENDPOINT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_hex() {
        assert_eq!(DEAD_ZONE.to_string(), "#666666");
        assert_eq!(HAS_ENDPOINT.to_string(), "#66cc66");
        assert_eq!(REGION_OUTLINE.to_string(), "#ffa500");
    }

    #[test]
    fn empty_cells_have_no_fill() {
        assert_eq!(cell_fill(Classification::Empty), None);
        assert_eq!(cell_fill(Classification::DeadZone), Some(DEAD_ZONE));
        assert_eq!(endpoint_color(true), PRIORITY_ENDPOINT);
    }
}
