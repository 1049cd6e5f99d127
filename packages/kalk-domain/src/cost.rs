use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{CatalogMatch, DesignElement};

/// The costed result of matching one design element against its best catalog
/// hit. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
	pub element_id: String,
	pub element_name: String,
	pub matched_catalog_id: Value,
	pub description: String,
	pub quantity: f64,
	pub unit_cost: f64,
	pub material_cost: f64,
	pub labor_cost: f64,
	pub total_cost: f64,
	pub labor_hours: f64,
	pub phase: String,
	pub similarity_percent: f64,
}

/// Project-level cost aggregate. Phase buckets are created lazily on first
/// contribution; `equipment` stays zero since no equipment-cost source exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
	pub labor: f64,
	pub materials: f64,
	pub equipment: f64,
	pub total: f64,
	pub by_phase: BTreeMap<String, f64>,
}
impl CostBreakdown {
	/// Costs one element against its best match and folds the result in.
	pub fn apply(
		&mut self,
		element: &DesignElement,
		best: &CatalogMatch,
		labor_rate: f64,
	) -> LineItem {
		let quantity = element.effective_quantity();
		let material_cost = best.estimated_unit_cost * quantity;
		let labor_cost = best.labor_hours * quantity * labor_rate;
		let total_cost = material_cost + labor_cost;

		self.labor += labor_cost;
		self.materials += material_cost;
		*self.by_phase.entry(best.phase.clone()).or_insert(0.0) += total_cost;

		LineItem {
			element_id: element.id.clone(),
			element_name: element.name.clone(),
			matched_catalog_id: best.id.clone(),
			description: best.description.clone(),
			quantity,
			unit_cost: best.estimated_unit_cost,
			material_cost,
			labor_cost,
			total_cost,
			labor_hours: best.labor_hours,
			phase: best.phase.clone(),
			similarity_percent: best.similarity_percent,
		}
	}

	/// Computes the grand total from the category sums. Called once after all
	/// elements are folded in, never incrementally.
	pub fn finalize(&mut self) {
		self.total = self.labor + self.materials + self.equipment;
	}
}
