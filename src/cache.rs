use log::info;
use serde::Serialize;

/// Every lookup fetches live data; the cache endpoints only report that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub message: &'static str,
    pub total_entries: u64,
    pub valid_entries: u64,
    pub expired_entries: u64,
    pub cache_enabled: bool,
}

pub fn clear() {
    info!("Cache system removed - all requests now fetch real-time data");
}

pub fn stats() -> CacheStats {
    CacheStats {
        message: "Cache system has been removed for real-time follower tracking",
        total_entries: 0,
        valid_entries: 0,
        expired_entries: 0,
        cache_enabled: false,
    }
}
