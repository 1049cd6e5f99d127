use serde_json::Value;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, models::EstimateRow};

pub struct NewEstimate<'a> {
	pub estimate_id: Uuid,
	pub project_id: &'a str,
	pub line_items: &'a Value,
	pub cost_breakdown: &'a Value,
	pub language: &'a str,
	pub region: &'a str,
	pub created_at: OffsetDateTime,
}

pub async fn insert(pool: &PgPool, estimate: NewEstimate<'_>) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO estimates (
	estimate_id,
	project_id,
	line_items,
	cost_breakdown,
	language,
	region,
	created_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7)",
	)
	.bind(estimate.estimate_id)
	.bind(estimate.project_id)
	.bind(estimate.line_items)
	.bind(estimate.cost_breakdown)
	.bind(estimate.language)
	.bind(estimate.region)
	.bind(estimate.created_at)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn list_by_project(
	pool: &PgPool,
	project_id: &str,
	limit: i64,
) -> Result<Vec<EstimateRow>> {
	let rows = sqlx::query_as(
		"\
SELECT estimate_id, project_id, cost_breakdown, language, region, created_at
FROM estimates
WHERE project_id = $1
ORDER BY created_at DESC
LIMIT $2",
	)
	.bind(project_id)
	.bind(limit)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}
