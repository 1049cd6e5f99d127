//! Operational endpoints: health reporting and cache administration.

use serde::Serialize;

use crate::{EstimationService, ServiceResult, resolve::collection_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Ok,
	Degraded,
	Error,
}

/// Readiness snapshot. The service is healthy when at least one catalog
/// collection exists, degraded when the backend answers but neither does, and
/// errored when the backend cannot be reached at all.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
	pub status: HealthStatus,
	pub collection_en: bool,
	pub collection_de: bool,
}

impl EstimationService {
	/// Probes the similarity backend for the configured catalog collections.
	/// A backend failure yields an errored report instead of an error.
	pub async fn health(&self) -> HealthReport {
		let collections = match self.providers.index.collections().await {
			Ok(collections) => collections,
			Err(err) => {
				tracing::warn!(%err, "Health probe failed to list collections.");

				return HealthReport {
					status: HealthStatus::Error,
					collection_en: false,
					collection_de: false,
				};
			},
		};
		let qdrant = &self.cfg.storage.qdrant;
		let collection_en = collections
			.iter()
			.any(|name| name.as_str() == collection_for(qdrant, kalk_domain::Language::En));
		let collection_de = collections
			.iter()
			.any(|name| name.as_str() == collection_for(qdrant, kalk_domain::Language::De));
		let status =
			if collection_en || collection_de { HealthStatus::Ok } else { HealthStatus::Degraded };

		HealthReport { status, collection_en, collection_de }
	}

	/// Drops every cached query result. Returns the number of entries removed.
	pub async fn clear_cache(&self) -> ServiceResult<usize> {
		let removed = self.cache.len();

		self.cache.clear();

		tracing::info!(removed, "Cleared the query cache.");

		Ok(removed)
	}
}
