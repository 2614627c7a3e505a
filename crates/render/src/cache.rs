// STD Dependencies -----------------------------------------------------------
use std::collections::HashMap;


// Search Seed Cache ----------------------------------------------------------
/// Remembers successful search results per style bucket and hands out the
/// most frequently seen one as the next search seed. Purely an
/// optimization: a cold or lost cache only costs extra bisection probes.
#[derive(Debug, Default)]
pub struct SearchCache {
    dpi: HashMap<u32, HashMap<u32, u32>>,
    width: HashMap<(u32, u32), HashMap<u32, u32>>
}

impl SearchCache {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_dpi(&self, height: u32) -> Option<u32> {
        most_frequent(self.dpi.get(&height)?)
    }

    pub fn record_dpi(&mut self, height: u32, dpi: u32) {
        *self.dpi.entry(height).or_default().entry(dpi).or_insert(0) += 1;
    }

    pub fn seed_width(&self, height: u32, max_width: u32) -> Option<u32> {
        most_frequent(self.width.get(&(height, max_width))?)
    }

    pub fn record_width(&mut self, height: u32, max_width: u32, param: u32) {
        *self.width.entry((height, max_width)).or_default().entry(param).or_insert(0) += 1;
    }

}

fn most_frequent(counts: &HashMap<u32, u32>) -> Option<u32> {
    // Ties prefer the larger value so seeds never undershoot needlessly
    counts.iter().max_by_key(|(value, count)| (**count, **value)).map(|(value, _)| *value)
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use super::SearchCache;

    #[test]
    fn test_empty_cache_has_no_seed() {
        let cache = SearchCache::new();
        assert_eq!(cache.seed_dpi(200), None);
        assert_eq!(cache.seed_width(200, 900), None);
    }

    #[test]
    fn test_most_frequent_wins() {
        let mut cache = SearchCache::new();
        cache.record_dpi(200, 96);
        cache.record_dpi(200, 120);
        cache.record_dpi(200, 120);
        assert_eq!(cache.seed_dpi(200), Some(120));
        // other buckets are unaffected
        assert_eq!(cache.seed_dpi(36), None);
    }

    #[test]
    fn test_width_buckets_keyed_by_style() {
        let mut cache = SearchCache::new();
        cache.record_width(24, 900, 620);
        assert_eq!(cache.seed_width(24, 900), Some(620));
        assert_eq!(cache.seed_width(24, 700), None);
    }
}
