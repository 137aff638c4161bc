//! Renderers over a finished [`CoverageReport`](crate::engine::CoverageReport).
//!
//! - `geojson` - every layer as one FeatureCollection
//! - `svg` - static image of the classified grid
//! - `html` - interactive Leaflet page with the per-region legend
//! - `json` - statistics document
//! - `color` - shared palette

pub mod color;
mod geojson;
mod html;
mod json;
mod svg;

pub use geojson::{to_geojson, write_geojson};
pub use html::{to_html, write_html};
pub use json::{RegionSummary, StatsDocument, write_stats_file, write_stats_json};
pub use svg::{to_svg_string, write_svg, write_svg_file};

/// Display form of a region name: underscores become spaces, words are title-cased.
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = !c.is_alphabetic();
    }
    out
}

/// Escape text for HTML/XML element content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(display_name("VILA_MARIANA"), "Vila Mariana");
        assert_eq!(display_name("jardim paulista"), "Jardim Paulista");
        assert_eq!(display_name("zona-2b"), "Zona-2B");
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
