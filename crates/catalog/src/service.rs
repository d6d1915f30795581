//! Catalog service — workbook, asset folders and the report cache behind one handle.

use dealerbot_config::CatalogConfig;
use dealerbot_core::catalog::{AssetCategory, CandidateSource, MatchResult};
use dealerbot_core::error::CatalogError;
use dealerbot_core::sheet::SheetSource;
use std::sync::Arc;
use tracing::warn;

use crate::cache::DataCache;
use crate::report::{collect_report, FALLBACK_REPORT};
use crate::resolver::MatchPolicy;

pub struct Catalog {
    source: Arc<dyn SheetSource>,
    assets: Arc<dyn CandidateSource>,
    policy: MatchPolicy,
    fallback_tenors: Vec<u32>,
    cache: DataCache,
}

impl Catalog {
    pub fn new(
        source: Arc<dyn SheetSource>,
        assets: Arc<dyn CandidateSource>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            source,
            assets,
            policy: MatchPolicy::from(config),
            fallback_tenors: config.fallback_tenors.clone(),
            cache: DataCache::new(config.cache_expiry()),
        }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Read every sheet and render a fresh report, bypassing the cache.
    pub async fn produce_report(&self) -> Result<String, CatalogError> {
        let assets = Arc::clone(&self.assets);
        let candidates = tokio::task::spawn_blocking(move || assets.list_candidates(AssetCategory::Motors))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Asset listing task failed; report has no image folders");
                Vec::new()
            });
        let report = collect_report(self.source.as_ref(), &candidates, &self.policy).await?;
        Ok(report.render(&self.fallback_tenors))
    }

    /// The cached report, refreshed when stale or forced.
    ///
    /// Never fails: when the workbook cannot be read the last good report is
    /// served, and without one the fixed fallback sentence.
    pub async fn report(&self, force_refresh: bool) -> String {
        match self.cache.get(force_refresh, || self.produce_report()).await {
            Ok(report) => report,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Catalog refresh failed");
                match self.cache.stale().await {
                    Some(previous) => previous,
                    None => FALLBACK_REPORT.to_string(),
                }
            }
        }
    }

    /// Resolve a name against the current listing of an asset category.
    pub fn resolve_asset(&self, name: &str, category: AssetCategory) -> MatchResult {
        self.policy
            .resolve(name, &self.assets.list_candidates(category))
    }
}
