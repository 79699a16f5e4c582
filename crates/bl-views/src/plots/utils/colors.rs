//! Category color assignment
//!
//! Categories get colors from a fixed combined palette (five qualitative
//! palettes concatenated, order fixed) by first-seen ordinal. Beyond the
//! palette the assignment degrades to a continuous rainbow scale over the
//! category ordinal normalized to [0, 1].

use egui::Color32;
use indexmap::IndexMap;

const fn rgb(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub const CATEGORY10: [Color32; 10] = [
    rgb(0x1f77b4),
    rgb(0xff7f0e),
    rgb(0x2ca02c),
    rgb(0xd62728),
    rgb(0x9467bd),
    rgb(0x8c564b),
    rgb(0xe377c2),
    rgb(0x7f7f7f),
    rgb(0xbcbd22),
    rgb(0x17becf),
];

pub const SET3: [Color32; 12] = [
    rgb(0x8dd3c7),
    rgb(0xffffb3),
    rgb(0xbebada),
    rgb(0xfb8072),
    rgb(0x80b1d3),
    rgb(0xfdb462),
    rgb(0xb3de69),
    rgb(0xfccde5),
    rgb(0xd9d9d9),
    rgb(0xbc80bd),
    rgb(0xccebc5),
    rgb(0xffed6f),
];

pub const PAIRED: [Color32; 12] = [
    rgb(0xa6cee3),
    rgb(0x1f78b4),
    rgb(0xb2df8a),
    rgb(0x33a02c),
    rgb(0xfb9a99),
    rgb(0xe31a1c),
    rgb(0xfdbf6f),
    rgb(0xff7f00),
    rgb(0xcab2d6),
    rgb(0x6a3d9a),
    rgb(0xffff99),
    rgb(0xb15928),
];

pub const DARK2: [Color32; 8] = [
    rgb(0x1b9e77),
    rgb(0xd95f02),
    rgb(0x7570b3),
    rgb(0xe7298a),
    rgb(0x66a61e),
    rgb(0xe6ab02),
    rgb(0xa6761d),
    rgb(0x666666),
];

pub const ACCENT: [Color32; 8] = [
    rgb(0x7fc97f),
    rgb(0xbeaed4),
    rgb(0xfdc086),
    rgb(0xffff99),
    rgb(0x386cb0),
    rgb(0xf0027f),
    rgb(0xbf5b17),
    rgb(0x666666),
];

/// The combined palette, concatenation order fixed.
pub fn combined_palette() -> Vec<Color32> {
    CATEGORY10
        .iter()
        .chain(SET3.iter())
        .chain(PAIRED.iter())
        .chain(DARK2.iter())
        .chain(ACCENT.iter())
        .copied()
        .collect()
}

/// Continuous rainbow scale over `t` in [0, 1].
pub fn rainbow_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    hsl_to_rgb(t * 360.0, 0.85, 0.5)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color32 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Color32::from_rgb(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Stable mapping from category value to color for the lifetime of one
/// color/group attribute selection. Rebuilt on attribute or dataset change.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    map: IndexMap<String, Color32>,
}

impl ColorAssignment {
    /// Build an assignment for categories in first-seen dataset order.
    pub fn new(categories: impl IntoIterator<Item = String>) -> Self {
        let categories: Vec<String> = {
            // Dedup while preserving first-seen order.
            let mut seen = IndexMap::new();
            for c in categories {
                seen.entry(c).or_insert(());
            }
            seen.into_keys().collect()
        };

        let palette = combined_palette();
        let map = if categories.len() <= palette.len() {
            categories
                .into_iter()
                .zip(palette)
                .collect()
        } else {
            let last = (categories.len() - 1) as f32;
            categories
                .into_iter()
                .enumerate()
                .map(|(i, c)| (c, rainbow_color(i as f32 / last)))
                .collect()
        };

        Self { map }
    }

    /// Build from a dataset column, preserving row order of first sightings.
    pub fn from_column(
        dataset: &bl_core::data::Dataset,
        attribute: &str,
    ) -> Self {
        let Some(col) = dataset.column_index(attribute) else {
            return Self::default();
        };
        Self::new(
            dataset
                .rows()
                .iter()
                .filter_map(|r| r.value(col).map(|v| v.to_string())),
        )
    }

    /// Color for a category; unknown categories get a neutral gray.
    pub fn color(&self, category: &str) -> Color32 {
        self.map
            .get(category)
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// (category, color) pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color32)> {
        self.map.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
