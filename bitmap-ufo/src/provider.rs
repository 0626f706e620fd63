//! Resolving a tree of glyph provider descriptors
//!
//! A descriptor is a JSON document with a `providers` array. Each provider
//! either points at a texture sheet (`bitmap`), declares explicit advances
//! (`space`), or pulls in another descriptor (`reference`). Resolution walks
//! the tree depth first and flattens it into a [`ResolvedMap`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    error::Error,
    metrics::{SheetMetrics, DEFAULT_SHEET_HEIGHT},
};

/// Descriptors may include each other at most this deep.
const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Deserialize)]
struct Descriptor {
    providers: Vec<Provider>,
}

/// One entry in a descriptor's `providers` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Provider {
    /// Include another descriptor, by namespaced identifier.
    Reference { id: String },
    /// A texture sheet laid out as a 16 column grid.
    Bitmap {
        file: String,
        ascent: i32,
        #[serde(default = "default_height")]
        height: i32,
        chars: Vec<String>,
    },
    /// Explicit advances for characters that have no bitmap.
    Space { advances: IndexMap<char, f64> },
    /// Any provider type this converter does not read (`ttf`, `unihex`, ...)
    #[serde(other)]
    Unsupported,
}

fn default_height() -> i32 {
    DEFAULT_SHEET_HEIGHT
}

/// The flattened result of resolving a root descriptor.
///
/// All maps keep insertion order; sheets are keyed by the tail of their
/// `file` identifier, e.g. `font/ascii.png`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedMap {
    /// The rows of each sheet's grid, each row terminated by a newline.
    pub chars: IndexMap<String, String>,
    /// Advance overrides from `space` providers.
    pub spacing: IndexMap<char, f64>,
    pub sizing: IndexMap<String, SheetMetrics>,
}

impl ResolvedMap {
    /// Merge an included map into this one.
    ///
    /// Entries with the same key replace ours but keep their original position.
    fn merge(&mut self, other: ResolvedMap) {
        self.chars.extend(other.chars);
        self.spacing.extend(other.spacing);
        self.sizing.extend(other.sizing);
    }

    fn add_bitmap(&mut self, sheet: String, metrics: SheetMetrics, rows: &[String]) {
        let mut grid = String::new();
        for row in rows {
            grid.push_str(row);
            grid.push('\n');
        }
        self.sizing.insert(sheet.clone(), metrics);
        self.chars.insert(sheet, grid);
    }

    /// Every character that appears in some sheet's grid, once, in map order.
    ///
    /// Whitespace and control characters mark empty cells and are never yielded.
    pub fn distinct_chars(&self) -> impl Iterator<Item = char> + '_ {
        let mut seen = std::collections::HashSet::new();
        self.chars
            .values()
            .flat_map(|grid| grid.chars())
            .filter(|ch| !is_empty_cell(*ch))
            .filter(move |ch| seen.insert(*ch))
    }
}

pub(crate) fn is_empty_cell(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control()
}

/// Strip the namespace from an identifier like `minecraft:include/default`.
pub(crate) fn identifier_tail(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, tail)| tail)
}

/// Resolve the descriptor at `path` and everything it references.
///
/// References are looked up relative to the directory containing `path`.
pub fn resolve(path: &Path) -> Result<ResolvedMap, Error> {
    let map_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut resolver = Resolver {
        map_dir,
        stack: Vec::new(),
    };
    resolver.load(path)
}

struct Resolver<'a> {
    map_dir: &'a Path,
    // descriptors currently being loaded, outermost first
    stack: Vec<PathBuf>,
}

impl Resolver<'_> {
    fn load(&mut self, path: &Path) -> Result<ResolvedMap, Error> {
        if self.stack.iter().any(|seen| seen == path) {
            return Err(Error::ReferenceCycle { path: path.into() });
        }
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep { path: path.into() });
        }
        let descriptor = read_descriptor(path)?;
        log::debug!(
            "loading {} providers from '{}'",
            descriptor.providers.len(),
            path.display()
        );

        self.stack.push(path.to_owned());
        let mut resolved = ResolvedMap::default();
        for provider in descriptor.providers {
            match provider {
                Provider::Reference { id } => {
                    let target = self
                        .map_dir
                        .join(format!("{}.json", identifier_tail(&id)));
                    let included = self.load(&target)?;
                    resolved.merge(included);
                }
                Provider::Bitmap {
                    file,
                    ascent,
                    height,
                    chars,
                } => {
                    let sheet = identifier_tail(&file).to_owned();
                    resolved.add_bitmap(sheet, SheetMetrics::new(ascent, height), &chars);
                }
                Provider::Space { advances } => resolved.spacing.extend(advances),
                Provider::Unsupported => {
                    log::debug!("skipping unsupported provider in '{}'", path.display())
                }
            }
        }
        self.stack.pop();
        Ok(resolved)
    }
}

fn read_descriptor(path: &Path) -> Result<Descriptor, Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::malformed(path, e))
}
