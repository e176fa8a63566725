use std::time::Duration;

use crate::{
    catalog::{Catalog, CatalogLayout},
    foundation::{
        error::{RigError, RigResult},
        paths::resolve_url,
    },
};

pub const DEFAULT_SITE_URL: &str = "https://dlportraits.space/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Catalog served over HTTP. No retries and no caching: a failed fetch is reported once.
pub struct HttpCatalog {
    site_url: String,
    layout: CatalogLayout,
    agent: ureq::Agent,
}

impl HttpCatalog {
    pub fn new(site_url: impl Into<String>, layout: CatalogLayout, timeout: Duration) -> Self {
        Self {
            site_url: site_url.into(),
            layout,
            agent: build_agent(timeout),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Absolute URL of a catalog-relative path.
    pub fn url_for(&self, rel_path: &str) -> String {
        resolve_url(&self.site_url, rel_path)
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_SITE_URL,
            CatalogLayout::default(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

impl Catalog for HttpCatalog {
    fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    #[tracing::instrument(skip(self))]
    fn fetch_bytes(&self, rel_path: &str) -> RigResult<Vec<u8>> {
        let url = self.url_for(rel_path);
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| RigError::catalog(format!("GET {url} failed: {e}")))?;
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| RigError::catalog(format!("read body of {url}: {e}")))?;
        tracing::debug!(%url, len = bytes.len(), "fetched");
        Ok(bytes)
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}
