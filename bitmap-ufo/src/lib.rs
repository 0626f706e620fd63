//! Convert a bitmap font asset tree into a UFO vector font source.
//!
//! The input is a directory of JSON provider descriptors and PNG texture
//! sheets, each sheet a 16 column grid of character cells. Every character
//! found in the sheets is traced into a `.glif` outline made of one unit
//! square per lit pixel, and the glyphs are written as a UFO 3 package that
//! a font compiler can build into a binary font.
//!
//! ```no_run
//! let options = bitmap_ufo::BuildOptions::default();
//! let summary = bitmap_ufo::resolve_and_emit(&options).unwrap();
//! println!("{} glyphs", summary.glyphs);
//! ```

mod assets;
mod error;
pub mod glif;
mod metrics;
mod names;
pub mod outline;
pub mod plist;
pub mod provider;
pub mod sheet;
pub mod writer;

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma};

pub use assets::{AssetTree, Step, StepStatus};
pub use error::Error;
pub use metrics::{FontMetrics, SheetMetrics, DEFAULT_SHEET_HEIGHT};
pub use names::{sanitize, CharNames, UnicodeNames};
pub use outline::{GlyphRecord, Identity, OutlineEmitter};
pub use provider::{resolve, ResolvedMap};
pub use writer::{FontInfo, UfoWriter, NOTDEF};

/// Font units per source pixel.
pub const DEFAULT_SCALE: i32 = 100;
/// Largest accepted scale; font unit coordinates stay well inside `i32`.
pub const MAX_SCALE: i32 = 10_000;
pub const DEFAULT_UNITS_PER_EM: u32 = 1000;

/// Everything needed for one conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Root of the asset tree (containing `texture` and `map`).
    pub input_dir: PathBuf,
    /// Directory the `<font>.ufo` package is written into.
    pub output_dir: PathBuf,
    /// Name of the root descriptor, and the font's family name.
    pub font_name: String,
    pub style_name: String,
    pub scale: i32,
    pub units_per_em: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            input_dir: PathBuf::from("assets/font"),
            output_dir: PathBuf::from("assets/font/ufo"),
            font_name: "default".into(),
            style_name: "Regular".into(),
            scale: DEFAULT_SCALE,
            units_per_em: DEFAULT_UNITS_PER_EM,
        }
    }
}

impl BuildOptions {
    /// The UFO package written by this run.
    pub fn ufo_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}.ufo", self.font_name))
    }
}

/// What a conversion run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildSummary {
    pub ufo_dir: PathBuf,
    pub metrics: FontMetrics,
    /// Glyphs written, `.notdef` included.
    pub glyphs: usize,
    /// Characters whose cell had no ink.
    pub blank: usize,
    /// Characters that could not be found in any sheet.
    pub unlocated: usize,
}

/// Resolve the descriptor tree for `font_name` and reduce it to font metrics.
pub fn compute_metrics(input_dir: &Path, font_name: &str) -> Result<FontMetrics, Error> {
    let assets = AssetTree::new(input_dir);
    let map = provider::resolve(&assets.descriptor(font_name))?;
    Ok(FontMetrics::from_sizing(&map.sizing))
}

/// Run the whole conversion, naming glyphs from the Unicode database.
pub fn resolve_and_emit(options: &BuildOptions) -> Result<BuildSummary, Error> {
    resolve_and_emit_with_names(options, &UnicodeNames)
}

/// Run the whole conversion with a custom source of character names.
///
/// Files written before an error are left in place.
pub fn resolve_and_emit_with_names(
    options: &BuildOptions,
    names: &dyn CharNames,
) -> Result<BuildSummary, Error> {
    if !(1..=MAX_SCALE).contains(&options.scale) {
        return Err(Error::ScaleOutOfRange {
            scale: options.scale,
            max: MAX_SCALE,
        });
    }
    let assets = AssetTree::new(&options.input_dir);
    log::info!("loading assets from '{}'", assets.root().display());
    let map = provider::resolve(&assets.descriptor(&options.font_name))?;
    let metrics = FontMetrics::from_sizing(&map.sizing);
    for (sheet, sizing) in &map.sizing {
        log::debug!(
            "sheet '{sheet}': ascent {}, height {}",
            sizing.ascent,
            sizing.height
        );
    }
    log::info!(
        "max ascent {}, max descent {}",
        metrics.max_ascent,
        metrics.max_descent
    );

    let emitter = OutlineEmitter::new(metrics, options.scale, names);
    let mut writer = UfoWriter::create(options.ufo_dir())?;
    let mut summary = BuildSummary {
        ufo_dir: options.ufo_dir(),
        metrics,
        glyphs: 0,
        blank: 0,
        unlocated: 0,
    };

    writer.write_glyph(&notdef_glyph(&assets, &emitter, &metrics)?)?;
    summary.glyphs += 1;

    let mut sheets = sheet::SheetCache::new(&assets);
    for ch in map.distinct_chars() {
        let Some(location) = sheet::locate(ch, &map) else {
            log::debug!("{ch:?} is not in any sheet");
            summary.unlocated += 1;
            continue;
        };
        let sheet_metrics = map
            .sizing
            .get(&location.sheet)
            .copied()
            .unwrap_or_else(|| metrics.fallback_sheet());
        let image = sheets.get(&location.sheet)?;
        let record = sheet::crop(image, &location, sheet_metrics).and_then(|cell| {
            emitter.emit(&cell, Identity::Codepoint(ch), Some(sheet_metrics))
        });
        match record {
            Some(record) => {
                writer.write_glyph(&record)?;
                summary.glyphs += 1;
            }
            None => {
                log::debug!("{ch:?} has a blank cell in '{}'", location.sheet);
                summary.blank += 1;
            }
        }
    }

    writer.finish(&FontInfo {
        family_name: options.font_name.clone(),
        style_name: options.style_name.clone(),
        units_per_em: options.units_per_em,
        ascender: metrics.ascender(options.scale),
        descender: metrics.descender(options.scale),
    })?;
    Ok(summary)
}

/// The `.notdef` glyph, from `texture/special/notdef.png` if it has any ink.
fn notdef_glyph(
    assets: &AssetTree,
    emitter: &OutlineEmitter<'_>,
    metrics: &FontMetrics,
) -> Result<GlyphRecord, Error> {
    let path = assets.notdef_image();
    let image = match sheet::load_image(&path) {
        Ok(image) => Some(image),
        Err(Error::MissingAsset { .. }) => None,
        Err(e) => return Err(e),
    };
    let identity = Identity::Name(NOTDEF.to_owned());
    image
        .and_then(|image| emitter.emit(&image, identity.clone(), None))
        .or_else(|| {
            log::warn!(
                "no usable notdef image at '{}', drawing a plain box",
                path.display()
            );
            emitter.emit(&fallback_notdef(metrics.max_ascent), identity, None)
        })
        .ok_or(Error::MissingAsset { path })
}

/// A hollow rectangle five pixels wide, as tall as the font's ascent.
fn fallback_notdef(max_ascent: i32) -> DynamicImage {
    const WIDTH: u32 = 5;
    let height = u32::try_from(max_ascent).unwrap_or(0).max(3);
    let image = GrayImage::from_fn(WIDTH, height, |x, y| {
        let edge = x == 0 || y == 0 || x == WIDTH - 1 || y == height - 1;
        Luma([if edge { 255 } else { 0 }])
    });
    DynamicImage::ImageLuma8(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_notdef_is_hollow() {
        let image = fallback_notdef(7).into_luma8();
        assert_eq!(image.dimensions(), (5, 7));
        assert_eq!(image.get_pixel(0, 3).0, [255]);
        assert_eq!(image.get_pixel(2, 3).0, [0]);
        assert_eq!(image.get_pixel(2, 6).0, [255]);
    }

    #[test]
    fn fallback_notdef_has_a_minimum_size() {
        let image = fallback_notdef(0).into_luma8();
        assert_eq!(image.dimensions(), (5, 3));
    }

    #[test]
    fn scale_is_checked_before_reading_assets() {
        let dir = tempfile::tempdir().unwrap();
        for scale in [0, -5, MAX_SCALE + 1, i32::MAX] {
            let options = BuildOptions {
                input_dir: dir.path().join("assets"),
                output_dir: dir.path().join("ufo"),
                scale,
                ..Default::default()
            };
            let err = resolve_and_emit(&options).unwrap_err();
            assert!(
                matches!(err, Error::ScaleOutOfRange { scale: s, max: MAX_SCALE } if s == scale),
                "{err}"
            );
            assert!(!options.output_dir.exists());
        }
    }

    #[test]
    fn ufo_dir_is_named_after_the_font() {
        let options = BuildOptions {
            output_dir: "out".into(),
            font_name: "alt".into(),
            ..Default::default()
        };
        assert_eq!(options.ufo_dir(), Path::new("out/alt.ufo"));
    }
}
