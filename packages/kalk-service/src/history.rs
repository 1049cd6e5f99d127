//! Estimate history lookups.

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use kalk_storage::{estimates, models::EstimateRow};

use crate::{EstimationService, ServiceError, ServiceResult};

/// One persisted estimate summary, newest first in history listings. Line
/// items are left out; the breakdown is enough for a history view.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectEstimate {
	pub estimate_id: Uuid,
	pub project_id: String,
	pub cost_breakdown: Value,
	pub language: String,
	pub region: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<EstimateRow> for ProjectEstimate {
	fn from(row: EstimateRow) -> Self {
		Self {
			estimate_id: row.estimate_id,
			project_id: row.project_id,
			cost_breakdown: row.cost_breakdown,
			language: row.language,
			region: row.region,
			created_at: row.created_at,
		}
	}
}

impl EstimationService {
	/// Lists the most recent estimates for a project, newest first, capped at
	/// the configured history limit.
	pub async fn project_history(&self, project_id: &str) -> ServiceResult<Vec<ProjectEstimate>> {
		let project_id = project_id.trim();

		if project_id.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Project id must not be empty.".to_string(),
			});
		}

		let rows = estimates::list_by_project(
			&self.db.pool,
			project_id,
			self.cfg.estimation.history_limit,
		)
		.await?;

		Ok(rows.into_iter().map(ProjectEstimate::from).collect())
	}
}
