//! Per-sheet and font-wide vertical metrics

use indexmap::IndexMap;

/// Height used for bitmap providers that do not declare one.
pub const DEFAULT_SHEET_HEIGHT: i32 = 8;

/// The vertical metrics of a single texture sheet, in pixel rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetMetrics {
    /// Distance from the top of a cell to the baseline.
    pub ascent: i32,
    /// Height of one grid cell.
    pub height: i32,
}

impl SheetMetrics {
    pub fn new(ascent: i32, height: i32) -> Self {
        SheetMetrics { ascent, height }
    }

    /// Distance from the baseline to the bottom of a cell.
    pub fn descent(&self) -> i32 {
        self.height - self.ascent
    }
}

/// Font-wide ascent and descent, the maxima over all resolved sheets.
///
/// Both values are non-negative pixel counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    pub max_ascent: i32,
    pub max_descent: i32,
}

impl FontMetrics {
    /// Reduce the metrics of every sheet to the font-wide maxima.
    ///
    /// An empty set of sheets yields zero for both values.
    pub fn from_sizing(sizing: &IndexMap<String, SheetMetrics>) -> Self {
        sizing
            .values()
            .fold(FontMetrics::default(), |acc, sheet| FontMetrics {
                max_ascent: acc.max_ascent.max(sheet.ascent),
                max_descent: acc.max_descent.max(sheet.descent()),
            })
    }

    /// The metrics assumed for a glyph whose owning sheet is unknown.
    pub fn fallback_sheet(&self) -> SheetMetrics {
        SheetMetrics::new(self.max_ascent, self.max_ascent + self.max_descent)
    }

    /// The ascender in font units.
    pub fn ascender(&self, scale: i32) -> i32 {
        self.max_ascent * scale
    }

    /// The descender in font units; zero or negative.
    pub fn descender(&self, scale: i32) -> i32 {
        -self.max_descent * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizing(sheets: &[(&str, i32, i32)]) -> IndexMap<String, SheetMetrics> {
        sheets
            .iter()
            .map(|(name, ascent, height)| (name.to_string(), SheetMetrics::new(*ascent, *height)))
            .collect()
    }

    #[test]
    fn empty_sizing_is_zero() {
        assert_eq!(FontMetrics::from_sizing(&IndexMap::new()), FontMetrics::default());
    }

    #[test]
    fn maxima_come_from_different_sheets() {
        let metrics = FontMetrics::from_sizing(&sizing(&[
            ("font/ascii.png", 7, 8),
            ("font/accented.png", 10, 12),
            ("font/nonlatin.png", 3, 9),
        ]));
        assert_eq!(metrics.max_ascent, 10);
        assert_eq!(metrics.max_descent, 6);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = sizing(&[("a", 5, 8), ("b", 7, 8), ("c", 2, 11)]);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            FontMetrics::from_sizing(&forward),
            FontMetrics::from_sizing(&reversed)
        );
    }

    #[test]
    fn negative_descent_is_ignored() {
        // ascent taller than the cell
        let metrics = FontMetrics::from_sizing(&sizing(&[("tall", 12, 8)]));
        assert_eq!(metrics.max_ascent, 12);
        assert_eq!(metrics.max_descent, 0);
    }

    #[test]
    fn font_units() {
        let metrics = FontMetrics {
            max_ascent: 7,
            max_descent: 2,
        };
        assert_eq!(metrics.ascender(100), 700);
        assert_eq!(metrics.descender(100), -200);
        assert_eq!(metrics.fallback_sheet(), SheetMetrics::new(7, 9));
    }
}
