// Seller metrics resolution: the three data layers and the engine that
// merges them.

pub mod aggregate_provider;
pub mod legacy_blob;
pub mod override_store;
pub mod resolution;
pub mod snapshot_store;

pub use aggregate_provider::AggregateSource;
pub use legacy_blob::LegacyBlobStore;
pub use override_store::{validate_override_value, OverrideStore};
pub use resolution::MetricsResolver;
pub use snapshot_store::SnapshotStore;
