//! Estimate assembly. Folds design elements into line items and a project
//! cost breakdown, then persists the result.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use kalk_domain::{CostBreakdown, DesignElement, Language, LineItem};
use kalk_storage::estimates::{self, NewEstimate};

use crate::{EstimationService, ServiceError, ServiceResult};

/// A batch of design elements to be estimated for one project.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
	pub project_id: String,
	pub elements: Vec<DesignElement>,
	pub language: Language,
	#[serde(default)]
	pub region: Option<String>,
}

/// An assembled but not yet persisted estimate. Line items keep the order of
/// the elements they were derived from; elements that could not be matched are
/// listed in `skipped_elements` instead of failing the batch.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
	pub project_id: String,
	pub language: Language,
	pub region: String,
	pub line_items: Vec<LineItem>,
	pub cost_breakdown: CostBreakdown,
	pub skipped_elements: Vec<String>,
}

/// An estimate that has been written to storage.
#[derive(Debug, Clone, Serialize)]
pub struct SavedEstimate {
	pub estimate_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(flatten)]
	pub estimate: Estimate,
}

impl EstimationService {
	/// Assembles an estimate without persisting it. Elements are resolved one
	/// at a time against the best catalog match; a failing element is logged
	/// and skipped so the remaining elements still produce line items.
	pub async fn build_estimate(&self, request: &EstimateRequest) -> ServiceResult<Estimate> {
		if request.project_id.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Project id must not be empty.".to_string(),
			});
		}
		if request.elements.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "At least one design element is required.".to_string(),
			});
		}

		let region = self.effective_region(request.region.as_deref());
		let mut breakdown = CostBreakdown::default();
		let mut line_items = Vec::with_capacity(request.elements.len());
		let mut skipped_elements = Vec::new();

		for element in &request.elements {
			match self.line_item_for(element, request.language, &region, &mut breakdown).await {
				Some(line_item) => line_items.push(line_item),
				None => skipped_elements.push(element.id.clone()),
			}
		}

		breakdown.finalize();

		Ok(Estimate {
			project_id: request.project_id.clone(),
			language: request.language,
			region,
			line_items,
			cost_breakdown: breakdown,
			skipped_elements,
		})
	}

	/// Assembles an estimate and persists it.
	pub async fn estimate_from_elements(
		&self,
		request: &EstimateRequest,
	) -> ServiceResult<SavedEstimate> {
		let estimate = self.build_estimate(request).await?;
		let estimate_id = Uuid::new_v4();
		let created_at = OffsetDateTime::now_utc();
		let line_items = serde_json::to_value(&estimate.line_items)
			.map_err(|err| ServiceError::Storage { message: err.to_string() })?;
		let cost_breakdown = serde_json::to_value(&estimate.cost_breakdown)
			.map_err(|err| ServiceError::Storage { message: err.to_string() })?;

		estimates::insert(
			&self.db.pool,
			NewEstimate {
				estimate_id,
				project_id: &estimate.project_id,
				line_items: &line_items,
				cost_breakdown: &cost_breakdown,
				language: estimate.language.as_str(),
				region: &estimate.region,
				created_at,
			},
		)
		.await?;

		tracing::info!(
			estimate_id = %estimate_id,
			project_id = estimate.project_id,
			line_items = estimate.line_items.len(),
			skipped = estimate.skipped_elements.len(),
			total = estimate.cost_breakdown.total,
			"Persisted estimate."
		);

		Ok(SavedEstimate { estimate_id, created_at, estimate })
	}

	async fn line_item_for(
		&self,
		element: &DesignElement,
		language: Language,
		region: &str,
		breakdown: &mut CostBreakdown,
	) -> Option<LineItem> {
		let description = element.description.trim();

		if description.is_empty() {
			tracing::warn!(element_id = element.id, "Skipping element with an empty description.");

			return None;
		}

		let matches = match self.resolve(description, language, region, 1).await {
			Ok(matches) => matches,
			Err(err) => {
				tracing::warn!(element_id = element.id, %err, "Skipping element after a resolution failure.");

				return None;
			},
		};
		let Some(best) = matches.first() else {
			tracing::warn!(element_id = element.id, "Skipping element with no catalog match.");

			return None;
		};

		Some(breakdown.apply(element, best, self.cfg.estimation.labor_rate_per_hour))
	}
}
