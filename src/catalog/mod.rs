//! Remote part catalog: character index, per-character part manifests, and layer images.

pub(crate) mod dir;
pub(crate) mod http;

use std::collections::BTreeMap;

use anyhow::Context as _;

use crate::foundation::{
    core::Offset,
    error::{RigError, RigResult},
    paths::normalize_rel_path,
};

pub use dir::DirCatalog;
pub use http::HttpCatalog;

/// Locale used when the requested one has no display name.
pub const FALLBACK_LOCALE: &str = "en_us";

/// Where catalog documents live, relative to the catalog root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogLayout {
    pub catalog_dir: String,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            catalog_dir: "portrait_output".to_string(),
        }
    }
}

impl CatalogLayout {
    pub fn index_path(&self) -> String {
        format!("{}/localizedDirData.json", self.catalog_dir)
    }

    pub fn manifest_path(&self, character_id: &str) -> String {
        format!("{}/{character_id}/data.json", self.catalog_dir)
    }

    pub fn base_path(&self, character_id: &str) -> String {
        format!("{}/{character_id}/{character_id}_base.png", self.catalog_dir)
    }
}

/// `localizedDirData.json`: every character id with its per-locale display names.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogIndex {
    #[serde(rename = "fileList")]
    pub file_list: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
}

impl CatalogIndex {
    /// Display name in `locale`, falling back to English and then to the id.
    pub fn display_name<'a>(&'a self, id: &'a str, locale: &str) -> &'a str {
        self.file_list
            .get(id)
            .and_then(|names| names.get(locale).or_else(|| names.get(FALLBACK_LOCALE)))
            .map(String::as_str)
            .unwrap_or(id)
    }

    /// Exact display-name match, as the typeahead selector only accepts listed entries.
    pub fn find_by_display_name(&self, name: &str, locale: &str) -> Option<&str> {
        self.file_list
            .keys()
            .find(|id| self.display_name(id, locale) == name)
            .map(String::as_str)
    }

    pub fn entries(&self, locale: &str) -> Vec<CatalogEntry> {
        self.file_list
            .keys()
            .map(|id| CatalogEntry {
                id: id.clone(),
                display_name: self.display_name(id, locale).to_string(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.file_list.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartsData {
    #[serde(rename = "faceParts", default)]
    pub face_parts: Vec<String>,
    #[serde(rename = "mouthParts", default)]
    pub mouth_parts: Vec<String>,
}

/// `<id>/data.json`: selectable parts and the overlay placement.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartsManifest {
    #[serde(rename = "partsData")]
    pub parts_data: PartsData,
    #[serde(default)]
    pub offset: Offset,
}

impl PartsManifest {
    /// Rewrite every part path into normalized catalog-relative form.
    pub fn normalized(mut self) -> RigResult<Self> {
        for path in self
            .parts_data
            .face_parts
            .iter_mut()
            .chain(self.parts_data.mouth_parts.iter_mut())
        {
            *path = normalize_rel_path(path)?;
        }
        Ok(self)
    }

    pub fn face(&self, index: usize) -> RigResult<&str> {
        part_at(&self.parts_data.face_parts, index, "face")
    }

    pub fn mouth(&self, index: usize) -> RigResult<&str> {
        part_at(&self.parts_data.mouth_parts, index, "mouth")
    }
}

fn part_at<'a>(parts: &'a [String], index: usize, kind: &str) -> RigResult<&'a str> {
    parts.get(index).map(String::as_str).ok_or_else(|| {
        RigError::validation(format!(
            "{kind} part {index} out of range ({} available)",
            parts.len()
        ))
    })
}

/// Source of catalog documents and layer images.
///
/// Implementors only supply raw byte access; parsing and path validation are shared.
pub trait Catalog {
    fn layout(&self) -> &CatalogLayout;

    /// Raw bytes of a normalized catalog-relative path.
    fn fetch_bytes(&self, rel_path: &str) -> RigResult<Vec<u8>>;

    fn index(&self) -> RigResult<CatalogIndex> {
        let path = self.layout().index_path();
        let bytes = self.fetch_bytes(&path)?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse catalog index '{path}'"))
            .map_err(|e| RigError::catalog(format!("{e:#}")))
    }

    fn manifest(&self, character_id: &str) -> RigResult<PartsManifest> {
        validate_character_id(character_id)?;
        let path = self.layout().manifest_path(character_id);
        let bytes = self.fetch_bytes(&path)?;
        let manifest: PartsManifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse parts manifest '{path}'"))
            .map_err(|e| RigError::catalog(format!("{e:#}")))?;
        manifest.normalized()
    }

    fn asset_bytes(&self, rel_path: &str) -> RigResult<Vec<u8>> {
        let path = normalize_rel_path(rel_path)?;
        self.fetch_bytes(&path)
    }
}

fn validate_character_id(id: &str) -> RigResult<()> {
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(RigError::validation(format!("invalid character id '{id}'")));
    }
    Ok(())
}
