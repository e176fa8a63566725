//! On-disk authoring state, so a session survives between command invocations.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;

use crate::{
    catalog::PartsManifest,
    emotion::Emotion,
    foundation::error::{RigError, RigResult},
    selection::PortraitSelection,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CharacterRef {
    /// Catalog key.
    pub id: String,
    pub display_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PartsManifest>,
    #[serde(default)]
    pub selection: PortraitSelection,
    /// Insertion order.
    #[serde(default)]
    pub emotions: Vec<Emotion>,
}

impl ProjectFile {
    pub fn load(path: &Path) -> RigResult<Self> {
        let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| RigError::serde(format!("parse project '{}': {e}", path.display())))
    }

    /// Load `path`, or start an empty project when it does not exist yet.
    pub fn load_or_default(path: &Path) -> RigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> RigResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create project dir '{}'", parent.display()))?;
        }
        let f =
            File::create(path).with_context(|| format!("create project '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .map_err(|e| RigError::serde(format!("write project '{}': {e}", path.display())))?;
        w.flush()?;
        Ok(())
    }
}
