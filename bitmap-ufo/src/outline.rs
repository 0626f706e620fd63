//! Turning a cell's pixels into a vector glyph
//!
//! Every ink pixel becomes one closed, axis-aligned square contour. There is
//! no curve fitting and no merging of neighbouring squares; the result is a
//! stair-step outline that is exact at pixel resolution.

use image::DynamicImage;
use kurbo::Rect;

use crate::{
    glif::GlifDocument,
    metrics::{FontMetrics, SheetMetrics},
    names::{sanitize, CharNames},
    sheet::ink_bounds,
};

/// A pixel is ink if its luminance is above this value.
const INK_THRESHOLD: u32 = 0;

/// What a glyph is called: a character, or a bare name such as `.notdef`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Codepoint(char),
    Name(String),
}

/// One emitted glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRecord {
    pub name: String,
    /// The character this glyph draws; `None` for named glyphs.
    pub character: Option<char>,
    /// Contents of the `.glif` file.
    pub glif: String,
}

impl GlyphRecord {
    pub fn codepoint(&self) -> Option<u32> {
        self.character.map(u32::from)
    }
}

/// Converts cropped cells into glyph records for one run.
pub struct OutlineEmitter<'a> {
    metrics: FontMetrics,
    scale: i32,
    names: &'a dyn CharNames,
}

impl<'a> OutlineEmitter<'a> {
    /// `scale` is the number of font units per source pixel.
    pub fn new(metrics: FontMetrics, scale: i32, names: &'a dyn CharNames) -> Self {
        OutlineEmitter {
            metrics,
            scale,
            names,
        }
    }

    /// Build the glyph for `image`.
    ///
    /// `owner` is the metrics of the sheet the image was cut from, if known.
    /// Returns `None` if the image contains no ink at all.
    pub fn emit(
        &self,
        image: &DynamicImage,
        identity: Identity,
        owner: Option<SheetMetrics>,
    ) -> Option<GlyphRecord> {
        let image = image.flipv();
        let owner = owner.unwrap_or_else(|| self.metrics.fallback_sheet());
        let offset = self.vertical_offset(owner);
        let bounds = ink_bounds(&image)?;
        let advance = bounds.width() as i32 * self.scale;
        let contours = trace(&image, self.scale, offset);

        let (name, character) = match identity {
            Identity::Codepoint(ch) => {
                let name = self.names.name_of(ch).unwrap_or_else(|| ch.to_string());
                (name, Some(ch))
            }
            Identity::Name(name) => (sanitize(&name), None),
        };
        let glif = GlifDocument {
            name: &name,
            unicode: character,
            advance,
            contours: &contours,
        }
        .to_xml();
        Some(GlyphRecord {
            name,
            character,
            glif,
        })
    }

    /// The shift applied to glyphs from a sheet with a smaller ascent than the font.
    pub fn vertical_offset(&self, owner: SheetMetrics) -> i32 {
        (self.metrics.max_ascent - owner.ascent) * self.scale
    }
}

/// One unit square per ink pixel of an already flipped image, rows bottom up.
///
/// Pixel `(x, y)` covers `x*s + s/2 ..= (x+1)*s + s/2` horizontally and
/// `y*s + offset ..= (y+1)*s + offset` vertically.
pub fn trace(image: &DynamicImage, scale: i32, offset: i32) -> Vec<Rect> {
    let s = f64::from(scale);
    let shift = s / 2.0;
    let offset = f64::from(offset);
    let mut contours = Vec::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            if luminance(image, x, y) <= INK_THRESHOLD {
                continue;
            }
            let (x, y) = (f64::from(x), f64::from(y));
            contours.push(Rect::new(
                x * s + shift,
                y * s + offset,
                (x + 1.0) * s + shift,
                (y + 1.0) * s + offset,
            ));
        }
    }
    contours
}

/// The brightness of a pixel, ignoring alpha.
///
/// Grey images use the grey value; colour images the integer mean of their
/// colour channels. Layouts without a meaningful integer value read as zero.
pub fn luminance(image: &DynamicImage, x: u32, y: u32) -> u32 {
    fn mean<T: Into<u32>>(r: T, g: T, b: T) -> u32 {
        (r.into() + g.into() + b.into()) / 3
    }

    match image {
        DynamicImage::ImageLuma8(img) => img.get_pixel(x, y).0[0].into(),
        DynamicImage::ImageLumaA8(img) => img.get_pixel(x, y).0[0].into(),
        DynamicImage::ImageRgb8(img) => {
            let [r, g, b] = img.get_pixel(x, y).0;
            mean(r, g, b)
        }
        DynamicImage::ImageRgba8(img) => {
            let [r, g, b, _] = img.get_pixel(x, y).0;
            mean(r, g, b)
        }
        DynamicImage::ImageLuma16(img) => img.get_pixel(x, y).0[0].into(),
        DynamicImage::ImageLumaA16(img) => img.get_pixel(x, y).0[0].into(),
        DynamicImage::ImageRgb16(img) => {
            let [r, g, b] = img.get_pixel(x, y).0;
            mean(r, g, b)
        }
        DynamicImage::ImageRgba16(img) => {
            let [r, g, b, _] = img.get_pixel(x, y).0;
            mean(r, g, b)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glif::corners;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgb32FImage, Rgba, RgbaImage};
    use rstest::rstest;

    fn no_names(_: char) -> Option<String> {
        None
    }

    fn test_names(ch: char) -> Option<String> {
        (ch == 'A').then(|| "LATIN CAPITAL LETTER A".to_string())
    }

    fn metrics(max_ascent: i32, max_descent: i32) -> FontMetrics {
        FontMetrics {
            max_ascent,
            max_descent,
        }
    }

    fn cell(width: u32, height: u32, lit: &[(u32, u32)]) -> DynamicImage {
        let mut image = RgbaImage::new(width, height);
        for (x, y) in lit {
            image.put_pixel(*x, *y, Rgba([255, 255, 255, 255]));
        }
        DynamicImage::ImageRgba8(image)
    }

    #[test]
    fn single_pixel_at_origin() {
        // bottom-left pixel of an 8 row cell sits at y = 7 before flipping
        let image = cell(8, 8, &[(0, 7)]);
        let names = test_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        let record = emitter
            .emit(&image, Identity::Codepoint('A'), Some(SheetMetrics::new(7, 8)))
            .unwrap();

        assert_eq!(record.name, "LATIN CAPITAL LETTER A");
        assert_eq!(record.codepoint(), Some(0x41));
        assert!(record.glif.contains(r#"<advance width="100" />"#));
        assert!(record.glif.contains(concat!(
            r#"<contour><point x="50" y="0" type="line" />"#,
            r#"<point x="50" y="100" type="line" />"#,
            r#"<point x="150" y="100" type="line" />"#,
            r#"<point x="150" y="0" type="line" /></contour>"#,
        )));
    }

    #[test]
    fn blank_image_emits_nothing() {
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        assert!(emitter
            .emit(&cell(8, 8, &[]), Identity::Codepoint('a'), None)
            .is_none());
    }

    #[test]
    fn advance_spans_ink_columns() {
        let image = cell(8, 8, &[(1, 0), (4, 6)]);
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        let record = emitter
            .emit(&image, Identity::Codepoint('x'), None)
            .unwrap();
        assert!(record.glif.contains(r#"<advance width="400" />"#));
    }

    #[test]
    fn lower_sheet_is_shifted_up() {
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 3), 100, &names);
        assert_eq!(emitter.vertical_offset(SheetMetrics::new(5, 8)), 200);
        assert_eq!(emitter.vertical_offset(SheetMetrics::new(7, 8)), 0);

        let record = emitter
            .emit(
                &cell(8, 8, &[(0, 7)]),
                Identity::Codepoint('b'),
                Some(SheetMetrics::new(5, 8)),
            )
            .unwrap();
        assert!(record.glif.contains(r#"<point x="50" y="200" type="line" />"#));
        assert!(record.glif.contains(r#"<point x="150" y="300" type="line" />"#));
    }

    #[test]
    fn unknown_owner_uses_font_metrics() {
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 2), 10, &names);
        let record = emitter
            .emit(&cell(2, 2, &[(0, 0)]), Identity::Codepoint('c'), None)
            .unwrap();
        // top-left pixel of a 2 row image lands in the second row after flipping
        assert!(record.glif.contains(r#"<point x="5" y="10" type="line" />"#));
    }

    #[test]
    fn unnamed_codepoint_uses_literal_character() {
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        let record = emitter
            .emit(&cell(1, 1, &[(0, 0)]), Identity::Codepoint('\u{E000}'), None)
            .unwrap();
        assert_eq!(record.name, "\u{E000}");
        assert!(record.glif.contains(r#"<unicode hex="E000" />"#));
    }

    #[test]
    fn literal_names_are_sanitized() {
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        let record = emitter
            .emit(
                &cell(1, 1, &[(0, 0)]),
                Identity::Name("missing glyph!".into()),
                None,
            )
            .unwrap();
        assert_eq!(record.name, "missing_glyph_");
        assert_eq!(record.codepoint(), None);
        assert!(!record.glif.contains("<unicode"));
    }

    #[test]
    fn one_contour_per_ink_pixel() {
        let lit = [(0, 0), (3, 1), (2, 5), (7, 7)];
        let image = cell(8, 8, &lit).flipv();
        let contours = trace(&image, 100, 300);
        assert_eq!(contours.len(), lit.len());
        for rect in &contours {
            let [bottom_left, top_left, top_right, bottom_right] = corners(rect);
            let x = (bottom_left.x - 50.0) / 100.0;
            let y = (bottom_left.y - 300.0) / 100.0;
            assert_eq!(x.fract(), 0.0);
            assert_eq!(y.fract(), 0.0);
            assert_eq!(top_left.y, (y + 1.0) * 100.0 + 300.0);
            assert_eq!(top_right.x, (x + 1.0) * 100.0 + 50.0);
            assert_eq!(bottom_right.y, bottom_left.y);
        }
    }

    #[test]
    fn contours_run_bottom_row_first() {
        let image = cell(2, 2, &[(1, 0), (0, 1)]).flipv();
        let contours = trace(&image, 100, 0);
        assert_eq!(
            contours,
            [
                Rect::new(50.0, 0.0, 150.0, 100.0),
                Rect::new(150.0, 100.0, 250.0, 200.0),
            ]
        );
    }

    #[rstest]
    #[case::grey(DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([90]))), 90)]
    #[case::grey_alpha(
        DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_pixel(1, 1, LumaA([90, 0]))),
        90
    )]
    #[case::rgb(DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([10, 20, 31]))), 20)]
    #[case::rgba_ignores_alpha(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([3, 3, 4, 255]))),
        3
    )]
    #[case::float_falls_back(
        DynamicImage::ImageRgb32F(Rgb32FImage::from_pixel(1, 1, Rgb([1.0, 1.0, 1.0]))),
        0
    )]
    fn luminance_by_layout(#[case] image: DynamicImage, #[case] expected: u32) {
        assert_eq!(luminance(&image, 0, 0), expected);
    }

    #[test]
    fn emission_is_deterministic() {
        let image = cell(8, 8, &[(1, 1), (2, 3), (6, 6)]);
        let names = no_names;
        let emitter = OutlineEmitter::new(metrics(7, 1), 100, &names);
        let first = emitter.emit(&image, Identity::Codepoint('q'), None);
        let second = emitter.emit(&image, Identity::Codepoint('q'), None);
        assert_eq!(first, second);
    }
}
