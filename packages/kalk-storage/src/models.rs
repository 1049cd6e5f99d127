use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// One persisted estimate as read back for project history. Line items are
/// stored but not loaded here; history consumers only need the breakdown.
#[derive(Debug, sqlx::FromRow)]
pub struct EstimateRow {
	pub estimate_id: Uuid,
	pub project_id: String,
	pub cost_breakdown: Value,
	pub language: String,
	pub region: String,
	pub created_at: OffsetDateTime,
}
