//! Writing glyphs and metadata into a UFO 3 directory
//!
//! ```text
//! <font>.ufo/metainfo.plist
//! <font>.ufo/layercontents.plist
//! <font>.ufo/fontinfo.plist
//! <font>.ufo/glyphs/contents.plist
//! <font>.ufo/glyphs/*.glif
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{error::Error, names::sanitize, outline::GlyphRecord, plist::Plist};

/// The name of the glyph drawn for characters the font does not cover.
pub const NOTDEF: &str = ".notdef";
const NOTDEF_FILE: &str = "notdef.glif";

const CREATOR: &str = "com.mojang.minecraft";
const FORMAT_VERSION: i64 = 3;
const DEFAULT_LAYER: &str = "public.default";
const GLYPHS_DIR: &str = "glyphs";

/// The font-wide values written to `fontinfo.plist`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub units_per_em: u32,
    pub ascender: i32,
    pub descender: i32,
}

impl FontInfo {
    fn to_plist(&self) -> Plist {
        [
            ("familyName", Plist::from(self.family_name.as_str())),
            ("styleName", self.style_name.as_str().into()),
            ("unitsPerEm", i64::from(self.units_per_em).into()),
            ("ascender", i64::from(self.ascender).into()),
            ("descender", i64::from(self.descender).into()),
        ]
        .into_iter()
        .collect()
    }
}

/// Writes glyphs one at a time and keeps the glyph name index.
#[derive(Debug)]
pub struct UfoWriter {
    root: PathBuf,
    glyphs_dir: PathBuf,
    contents: BTreeMap<String, String>,
}

impl UfoWriter {
    /// Create the UFO directory tree at `root` and write the layer metadata.
    ///
    /// Existing files are overwritten; anything else in the directory is left alone.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let glyphs_dir = root.join(GLYPHS_DIR);
        std::fs::create_dir_all(&glyphs_dir).map_err(|source| Error::Io {
            path: glyphs_dir.clone(),
            source,
        })?;

        let metainfo: Plist = [
            ("creator", Plist::from(CREATOR)),
            ("formatVersion", FORMAT_VERSION.into()),
        ]
        .into_iter()
        .collect();
        write_file(&root.join("metainfo.plist"), metainfo.to_xml())?;
        let layers = Plist::from(vec![vec![DEFAULT_LAYER, GLYPHS_DIR]]);
        write_file(&root.join("layercontents.plist"), layers.to_xml())?;

        let mut contents = BTreeMap::new();
        contents.insert(NOTDEF.to_owned(), NOTDEF_FILE.to_owned());
        Ok(UfoWriter {
            root,
            glyphs_dir,
            contents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The glyph name index collected so far.
    pub fn contents(&self) -> &BTreeMap<String, String> {
        &self.contents
    }

    /// Write one glyph and add it to the index, returning the path written.
    pub fn write_glyph(&mut self, record: &GlyphRecord) -> Result<PathBuf, Error> {
        let file_name = glif_file_name(record);
        let path = self.glyphs_dir.join(&file_name);
        write_file(&path, record.glif.as_bytes())?;

        let key = self.index_key(&sanitize(&record.name), &file_name);
        self.contents.insert(key, file_name);
        Ok(path)
    }

    // a key already used for another file gets a numeric suffix
    fn index_key(&self, key: &str, file_name: &str) -> String {
        let is_free = |candidate: &str| {
            self.contents
                .get(candidate)
                .map_or(true, |existing| existing == file_name)
        };
        if is_free(key) {
            return key.to_owned();
        }
        let unique = (1..)
            .map(|n| format!("{key}.{n}"))
            .find(|candidate| is_free(candidate.as_str()))
            .unwrap_or_else(|| key.to_owned());
        log::warn!("glyph name '{key}' is already taken, indexing '{file_name}' as '{unique}'");
        unique
    }

    /// Write the glyph index and the font info, completing the UFO.
    pub fn finish(self, info: &FontInfo) -> Result<(), Error> {
        let contents: Plist = self
            .contents
            .iter()
            .map(|(name, file)| (name.as_str(), file.as_str()))
            .collect();
        write_file(&self.glyphs_dir.join("contents.plist"), contents.to_xml())?;
        write_file(&self.root.join("fontinfo.plist"), info.to_plist().to_xml())?;
        log::info!(
            "wrote {} glyphs to '{}'",
            self.contents.len(),
            self.root.display()
        );
        Ok(())
    }
}

/// `<decimal codepoint>.glif` for characters, the name otherwise.
pub fn glif_file_name(record: &GlyphRecord) -> String {
    match record.codepoint() {
        Some(codepoint) => format!("{codepoint}.glif"),
        None => format!("{}.glif", sanitize(record.name.trim_start_matches('.'))),
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), Error> {
    std::fs::write(path, contents).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })
}
