use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    catalog::{Catalog, CatalogLayout},
    foundation::error::{RigError, RigResult},
};

/// Catalog mirrored on the local filesystem with the same layout as the site.
pub struct DirCatalog {
    root: PathBuf,
    layout: CatalogLayout,
}

impl DirCatalog {
    pub fn new(root: impl AsRef<Path>, layout: CatalogLayout) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Catalog for DirCatalog {
    fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    fn fetch_bytes(&self, rel_path: &str) -> RigResult<Vec<u8>> {
        let path = self.root.join(rel_path);
        std::fs::read(&path)
            .with_context(|| format!("read '{}'", path.display()))
            .map_err(|e| RigError::catalog(format!("{e:#}")))
    }
}
