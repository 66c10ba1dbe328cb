//! TTL cache for raw per-source feature sets.
//!
//! Keys bucket the query coordinate and radius so repeated interactive
//! queries for near-identical locations reuse one entry. Expiry is lazy;
//! there is no background sweeper.

mod memory;
mod r#trait;
mod types;

pub use memory::MemoryCache;
pub use r#trait::{FeatureCache, NoOpCache};
pub use types::{CacheError, CacheKey};

use std::time::Duration;

/// Default entry time-to-live.
///
/// Infrastructure registries change infrequently; staleness up to this
/// bound is tolerated.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 3600);
