//! Finding a character's cell in a texture sheet and cutting it out

use std::collections::HashMap;

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, Primitive};

use crate::{assets::AssetTree, error::Error, metrics::SheetMetrics, provider::ResolvedMap};

/// Every sheet is laid out as a grid with this many columns.
pub const GRID_COLUMNS: u32 = 16;

/// The position of a character within the resolved sheets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLocation {
    /// The sheet name, as a key of [`ResolvedMap::chars`].
    pub sheet: String,
    pub row: u32,
    pub column: u32,
}

/// Find the first cell holding `target`.
///
/// Sheets are searched in resolution order, then rows top to bottom and
/// columns left to right.
pub fn locate(target: char, map: &ResolvedMap) -> Option<SheetLocation> {
    map.chars.iter().find_map(|(sheet, grid)| {
        grid.split('\n').enumerate().find_map(|(row, line)| {
            line.chars()
                .position(|ch| ch == target)
                .map(|column| SheetLocation {
                    sheet: sheet.clone(),
                    row: row as u32,
                    column: column as u32,
                })
        })
    })
}

/// Cut the cell at `location` out of its sheet image.
///
/// Returns `None` if the cell falls outside the image or has no opaque pixels.
pub fn crop(
    sheet: &DynamicImage,
    location: &SheetLocation,
    metrics: SheetMetrics,
) -> Option<DynamicImage> {
    let cell_width = sheet.width() / GRID_COLUMNS;
    let cell_height = u32::try_from(metrics.height).ok()?;
    if cell_width == 0 || cell_height == 0 {
        return None;
    }
    let left = location.column.checked_mul(cell_width)?;
    let top = location.row.checked_mul(cell_height)?;
    if left.checked_add(cell_width)? > sheet.width()
        || top.checked_add(cell_height)? > sheet.height()
    {
        log::debug!(
            "cell ({}, {}) lies outside sheet '{}'",
            location.row,
            location.column,
            location.sheet
        );
        return None;
    }
    let cell = sheet.crop_imm(left, top, cell_width, cell_height);
    opaque_bounds(&cell).is_some().then_some(cell)
}

/// Inclusive pixel bounds of some set of pixels in an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelBounds {
    /// The bounds of a set of pixel positions.
    pub fn of_positions(positions: impl IntoIterator<Item = (u32, u32)>) -> Option<Self> {
        positions.into_iter().fold(None, |bounds, (x, y)| {
            Some(match bounds {
                None => PixelBounds {
                    left: x,
                    top: y,
                    right: x,
                    bottom: y,
                },
                Some(b) => PixelBounds {
                    left: b.left.min(x),
                    top: b.top.min(y),
                    right: b.right.max(x),
                    bottom: b.bottom.max(y),
                },
            })
        })
    }

    /// Number of columns covered, counting both edges.
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }
}

/// Which samples make a pixel count as present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Coverage {
    /// Non-zero alpha; any non-zero channel for images without alpha.
    Opaque,
    /// Any non-zero channel, alpha included.
    Ink,
}

/// Bounds of the visible pixels: non-zero alpha if the image has an alpha
/// channel, any non-zero channel otherwise.
pub fn opaque_bounds(image: &DynamicImage) -> Option<PixelBounds> {
    sample_bounds(image, Coverage::Opaque)
}

/// Bounds of every pixel with any non-zero channel, alpha included.
pub fn ink_bounds(image: &DynamicImage) -> Option<PixelBounds> {
    sample_bounds(image, Coverage::Ink)
}

// samples are compared at their stored depth, so faint 16-bit pixels are not
// rounded away
fn sample_bounds(image: &DynamicImage, coverage: Coverage) -> Option<PixelBounds> {
    match image {
        DynamicImage::ImageLuma8(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageLumaA8(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgb8(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgba8(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageLuma16(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageLumaA16(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgb16(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgba16(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgb32F(img) => buffer_bounds(img, coverage),
        DynamicImage::ImageRgba32F(img) => buffer_bounds(img, coverage),
        _ => buffer_bounds(&image.to_rgba16(), coverage),
    }
}

fn buffer_bounds<P: Pixel>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    coverage: Coverage,
) -> Option<PixelBounds> {
    let zero = <P::Subpixel as Primitive>::DEFAULT_MIN_VALUE;
    let alpha_only = coverage == Coverage::Opaque && P::HAS_ALPHA;
    PixelBounds::of_positions(
        image
            .enumerate_pixels()
            .filter(|(_, _, pixel)| {
                let channels = pixel.channels();
                if alpha_only {
                    channels.last().is_some_and(|alpha| *alpha != zero)
                } else {
                    channels.iter().any(|sample| *sample != zero)
                }
            })
            .map(|(x, y, _)| (x, y)),
    )
}

/// Decoded sheet images, loaded on first use.
pub struct SheetCache<'a> {
    assets: &'a AssetTree,
    images: HashMap<String, DynamicImage>,
}

impl<'a> SheetCache<'a> {
    pub fn new(assets: &'a AssetTree) -> Self {
        SheetCache {
            assets,
            images: HashMap::new(),
        }
    }

    /// The decoded image for `sheet`, loading it if needed.
    pub fn get(&mut self, sheet: &str) -> Result<&DynamicImage, Error> {
        if !self.images.contains_key(sheet) {
            let image = load_image(&self.assets.sheet_image(sheet))?;
            log::debug!(
                "loaded sheet '{sheet}' ({}x{})",
                image.width(),
                image.height()
            );
            self.images.insert(sheet.to_owned(), image);
        }
        Ok(&self.images[sheet])
    }
}

/// Decode a PNG file.
pub(crate) fn load_image(path: &std::path::Path) -> Result<DynamicImage, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::from_io(path, e))?;
    image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .map_err(|e| Error::malformed(path, e))
}
