use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Phase assigned to a catalog match whose backend record carries none.
pub const DEFAULT_PHASE: &str = "Construction";

/// Supported catalog languages. Each language has its own catalog partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	En,
	De,
}
impl Language {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::En => "en",
			Self::De => "de",
		}
	}
}

/// A single similarity-search hit, normalized from the backend response.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMatch {
	/// Backend-assigned point identifier, numeric or string.
	pub id: Value,
	pub similarity_percent: f64,
	pub description: String,
	pub category: String,
	pub phase: String,
	pub labor_hours: f64,
	pub estimated_unit_cost: f64,
	/// Material name to quantity/spec mapping, backend-defined and opaque here.
	pub materials: Value,
}

/// A design-derived element to be matched and costed. The description is the
/// similarity query text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignElement {
	pub id: String,
	pub name: String,
	pub description: String,
	#[serde(default)]
	pub quantity: Option<f64>,
}
impl DesignElement {
	/// Absent or non-positive quantities count as a single unit.
	pub fn effective_quantity(&self) -> f64 {
		match self.quantity {
			Some(quantity) if quantity > 0.0 => quantity,
			_ => 1.0,
		}
	}
}

/// Scales a raw similarity score to a percentage rounded to one decimal place,
/// clamped to [0, 100].
pub fn similarity_percent(score: f32) -> f64 {
	let percent = (f64::from(score) * 100.0).clamp(0.0, 100.0);

	(percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn similarity_percent_rounds_to_one_decimal() {
		assert_eq!(similarity_percent(0.876_54), 87.7);
		assert_eq!(similarity_percent(0.5), 50.0);
	}

	#[test]
	fn similarity_percent_clamps_out_of_range_scores() {
		assert_eq!(similarity_percent(1.2), 100.0);
		assert_eq!(similarity_percent(-0.1), 0.0);
	}

	#[test]
	fn effective_quantity_defaults_to_one() {
		let mut element = DesignElement {
			id: "e1".to_string(),
			name: "Wall".to_string(),
			description: "load-bearing wall".to_string(),
			quantity: None,
		};

		assert_eq!(element.effective_quantity(), 1.0);

		element.quantity = Some(0.0);

		assert_eq!(element.effective_quantity(), 1.0);

		element.quantity = Some(-2.0);

		assert_eq!(element.effective_quantity(), 1.0);

		element.quantity = Some(3.5);

		assert_eq!(element.effective_quantity(), 3.5);
	}
}
