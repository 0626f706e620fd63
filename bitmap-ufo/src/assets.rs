//! The on-disk layout of the input asset tree and the output directories

use std::path::{Path, PathBuf};

/// A local copy of a bitmap font asset tree.
///
/// ```text
/// <root>/texture/<sheet>.png
/// <root>/texture/special/notdef.png
/// <root>/map/<font>.json
/// <root>/map/include/<name>.json
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetTree {
    root: PathBuf,
}

impl AssetTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetTree { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn map_dir(&self) -> PathBuf {
        self.root.join("map")
    }

    pub fn texture_dir(&self) -> PathBuf {
        self.root.join("texture")
    }

    /// Where compiled binary fonts are expected to land.
    pub fn generated_fonts_dir(&self) -> PathBuf {
        self.root.join("generated_fonts")
    }

    /// The root descriptor for the font called `font_name`.
    pub fn descriptor(&self, font_name: &str) -> PathBuf {
        self.map_dir().join(format!("{font_name}.json"))
    }

    /// The image for a sheet; only the file name of the sheet identifier is used.
    pub fn sheet_image(&self, sheet: &str) -> PathBuf {
        let file_name = Path::new(sheet)
            .file_name()
            .map(Path::new)
            .unwrap_or_else(|| Path::new(sheet));
        self.texture_dir().join(file_name)
    }

    pub fn notdef_image(&self) -> PathBuf {
        self.texture_dir().join("special").join("notdef.png")
    }

    /// Report which of the conversion steps have already produced output.
    pub fn status(&self, ufo_root: &Path) -> StepStatus {
        StepStatus {
            assets: is_filled(&self.texture_dir())
                && is_filled(&self.map_dir())
                && is_filled(&self.map_dir().join("include")),
            ufo: is_filled(ufo_root),
            compiled: is_filled(&self.generated_fonts_dir()),
        }
    }
}

impl Default for AssetTree {
    fn default() -> Self {
        AssetTree::new("assets/font")
    }
}

fn is_filled(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// One stage of the whole pipeline, from download to compiled font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Everything,
    Download,
    MakeUfo,
    Compile,
}

/// Whether each stage of the pipeline has left output on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStatus {
    /// Texture sheets and descriptors are present.
    pub assets: bool,
    pub ufo: bool,
    pub compiled: bool,
}

impl StepStatus {
    /// The step that should run next, if the state on disk is consistent.
    pub fn recommended(&self) -> Option<Step> {
        match (self.assets, self.ufo, self.compiled) {
            (true, false, _) => Some(Step::MakeUfo),
            (_, true, false) => Some(Step::Compile),
            (false, false, false) | (true, true, true) => Some(Step::Everything),
            _ => None,
        }
    }

    /// Steps whose input from a previous step is missing.
    pub fn blocked(&self) -> Vec<Step> {
        let mut blocked = Vec::new();
        if !self.assets {
            blocked.push(Step::MakeUfo);
        }
        if !self.ufo {
            blocked.push(Step::Compile);
        }
        blocked
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Everything => "everything",
            Step::Download => "download assets",
            Step::MakeUfo => "make UFO",
            Step::Compile => "compile font",
        };
        f.write_str(name)
    }
}
