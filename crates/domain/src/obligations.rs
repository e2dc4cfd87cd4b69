//! Outstanding-obligation check consulted before a vendor is retired.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::{EntityId, VendorId};
use tokio::sync::RwLock;

use crate::error::DomainError;

/// Answers whether a vendor still has unpaid invoices or pending payments.
///
/// Delete and deactivate are refused while this reports true.
#[async_trait]
pub trait ObligationsCheck: Send + Sync {
    async fn has_open_obligations(
        &self,
        vendor_id: VendorId,
        entity_id: EntityId,
    ) -> Result<bool, DomainError>;
}

/// Reports no obligations for any vendor. Used until an invoices service is
/// wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpenObligations;

#[async_trait]
impl ObligationsCheck for NoOpenObligations {
    async fn has_open_obligations(
        &self,
        _vendor_id: VendorId,
        _entity_id: EntityId,
    ) -> Result<bool, DomainError> {
        Ok(false)
    }
}

#[derive(Debug, Default)]
struct InMemoryObligationsState {
    open: HashSet<VendorId>,
    fail: bool,
}

/// Configurable obligations check for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObligations {
    state: Arc<RwLock<InMemoryObligationsState>>,
}

impl InMemoryObligations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a vendor as having open obligations.
    pub async fn open(&self, vendor_id: VendorId) {
        self.state.write().await.open.insert(vendor_id);
    }

    /// Clears a vendor's obligations.
    pub async fn settle(&self, vendor_id: VendorId) {
        self.state.write().await.open.remove(&vendor_id);
    }

    /// Makes every subsequent check fail.
    pub async fn set_fail(&self, fail: bool) {
        self.state.write().await.fail = fail;
    }
}

#[async_trait]
impl ObligationsCheck for InMemoryObligations {
    async fn has_open_obligations(
        &self,
        vendor_id: VendorId,
        _entity_id: EntityId,
    ) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        if state.fail {
            return Err(DomainError::Obligations(
                "invoices service unavailable".to_string(),
            ));
        }
        Ok(state.open.contains(&vendor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_open_obligations_always_answers_false() {
        let check = NoOpenObligations;
        let open = check
            .has_open_obligations(VendorId::new(), EntityId::new())
            .await
            .unwrap();
        assert!(!open);
    }

    #[tokio::test]
    async fn in_memory_tracks_open_and_settled() {
        let check = InMemoryObligations::new();
        let vendor = VendorId::new();
        let entity = EntityId::new();

        check.open(vendor).await;
        assert!(check.has_open_obligations(vendor, entity).await.unwrap());

        check.settle(vendor).await;
        assert!(!check.has_open_obligations(vendor, entity).await.unwrap());
    }

    #[tokio::test]
    async fn in_memory_can_fail() {
        let check = InMemoryObligations::new();
        check.set_fail(true).await;

        let err = check
            .has_open_obligations(VendorId::new(), EntityId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Obligations(_)));
    }
}
