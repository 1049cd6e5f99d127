use std::time::{Duration, Instant};

use dashmap::DashMap;

use kalk_domain::{CatalogMatch, Language};

/// Cache key for resolved similarity queries. The query text is case-folded so
/// lookups differing only in casing share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
	language: Language,
	region: String,
	query: String,
}
impl CacheKey {
	pub fn new(language: Language, region: &str, query: &str) -> Self {
		Self { language, region: region.to_string(), query: query.to_lowercase() }
	}
}

struct CacheEntry {
	matches: Vec<CatalogMatch>,
	inserted_at: Instant,
}

/// Time-bounded memoization of ranked result lists, keyed by
/// (language, region, query). Expired entries are removed lazily on read; a
/// `put` for an existing key replaces the previous entry outright, so at most
/// one live entry exists per key. Sharded map, so concurrent reads and
/// independent-key writes do not block each other. This layer knows nothing
/// about similarity or cost semantics.
pub struct QueryCache {
	ttl: Duration,
	entries: DashMap<CacheKey, CacheEntry>,
}
impl QueryCache {
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entries: DashMap::new() }
	}

	pub fn get(&self, key: &CacheKey) -> Option<Vec<CatalogMatch>> {
		let expired = match self.entries.get(key) {
			Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
				return Some(entry.matches.clone());
			},
			Some(_) => true,
			None => false,
		};

		if expired {
			// Re-check under the write lock; a concurrent put may have refreshed the key.
			self.entries.remove_if(key, |_, entry| entry.inserted_at.elapsed() >= self.ttl);
		}

		None
	}

	pub fn put(&self, key: CacheKey, matches: Vec<CatalogMatch>) {
		self.entries.insert(key, CacheEntry { matches, inserted_at: Instant::now() });
	}

	pub fn clear(&self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_match() -> CatalogMatch {
		CatalogMatch {
			id: serde_json::json!(7),
			similarity_percent: 88.2,
			description: "Pour concrete footing.".to_string(),
			category: "Concrete".to_string(),
			phase: "Foundation".to_string(),
			labor_hours: 4.0,
			estimated_unit_cost: 100.0,
			materials: serde_json::json!({}),
		}
	}

	#[test]
	fn returns_entries_within_ttl() {
		let cache = QueryCache::new(Duration::from_secs(60));
		let key = CacheKey::new(Language::En, "EE", "pour concrete footing");

		cache.put(key.clone(), vec![sample_match()]);

		let hit = cache.get(&key).expect("Expected a cache hit.");

		assert_eq!(hit.len(), 1);
		assert_eq!(hit[0].similarity_percent, 88.2);
	}

	#[test]
	fn expires_entries_after_ttl() {
		let cache = QueryCache::new(Duration::ZERO);
		let key = CacheKey::new(Language::En, "EE", "pour concrete footing");

		cache.put(key.clone(), vec![sample_match()]);

		assert!(cache.get(&key).is_none());
		assert!(cache.is_empty());
	}

	#[test]
	fn keys_are_case_folded() {
		let cache = QueryCache::new(Duration::from_secs(60));

		cache.put(CacheKey::new(Language::En, "EE", "Pour Concrete FOOTING"), vec![sample_match()]);

		assert!(cache.get(&CacheKey::new(Language::En, "EE", "pour concrete footing")).is_some());
	}

	#[test]
	fn distinct_regions_and_languages_do_not_collide() {
		let cache = QueryCache::new(Duration::from_secs(60));

		cache.put(CacheKey::new(Language::En, "EE", "drywall"), vec![sample_match()]);

		assert!(cache.get(&CacheKey::new(Language::En, "DE", "drywall")).is_none());
		assert!(cache.get(&CacheKey::new(Language::De, "EE", "drywall")).is_none());
	}

	#[test]
	fn clear_removes_everything() {
		let cache = QueryCache::new(Duration::from_secs(60));
		let key = CacheKey::new(Language::De, "DE", "trockenbau");

		cache.put(key.clone(), vec![sample_match()]);
		cache.clear();

		assert!(cache.get(&key).is_none());
		assert_eq!(cache.len(), 0);
	}

	#[test]
	fn put_replaces_the_previous_entry() {
		let cache = QueryCache::new(Duration::from_secs(60));
		let key = CacheKey::new(Language::En, "EE", "drywall");

		cache.put(key.clone(), vec![sample_match()]);
		cache.put(key.clone(), Vec::new());

		assert_eq!(cache.len(), 1);
		assert!(cache.get(&key).expect("Expected a cache hit.").is_empty());
	}
}
