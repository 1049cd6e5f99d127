pub mod catalog;
pub mod cost;

pub use catalog::{CatalogMatch, DEFAULT_PHASE, DesignElement, Language, similarity_percent};
pub use cost::{CostBreakdown, LineItem};
