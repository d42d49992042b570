// Legacy Blob Adapter - deprecated embedded analytics on the seller
// profile record.
//
// Sellers created before the override store existed may only have this
// form of administrator-set analytics. The resolution engine consults it
// as a whole-seller fallback when no synthetic snapshot exists at all.
// New administrator edits go through the override store; the write path
// here stays correct for the deprecated admin endpoint that still uses it.

use crate::types::{LegacyAuditEntry, MetricVector};
use crate::utils::ShopResult;

#[async_trait::async_trait(?Send)]
pub trait LegacyBlobStore {
    /// Parse the seller profile's embedded analytics structure.
    ///
    /// Absent or malformed content yields `(None, [])`, never an error.
    /// The vector is `None` when the blob carries no known metric keys.
    async fn read(
        &self,
        seller_id: &str,
    ) -> ShopResult<(Option<MetricVector>, Vec<LegacyAuditEntry>)>;

    /// Merge `partial` into the existing blob vector (unknown keys are
    /// dropped by the tolerant parse), append the audit entry, and persist
    /// the whole structure back onto the profile record.
    async fn write(
        &self,
        seller_id: &str,
        partial: &MetricVector,
        entry: LegacyAuditEntry,
    ) -> ShopResult<()>;
}
