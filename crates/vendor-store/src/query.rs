use common::{EntityId, VendorStatus, VendorType};

/// Builder for vendor listing queries.
///
/// Filters are combined with AND. Results are always scoped to a single
/// entity and ordered by vendor name.
#[derive(Debug, Clone)]
pub struct VendorQuery {
    /// Owning entity. Always applied.
    pub entity_id: EntityId,

    /// Filter by exact status.
    pub status: Option<VendorStatus>,

    /// Filter by vendor type.
    pub vendor_type: Option<VendorType>,

    /// Maximum number of vendors to return.
    pub limit: Option<u32>,

    /// Number of vendors to skip.
    pub offset: Option<u64>,
}

impl VendorQuery {
    /// Creates a query returning every vendor of the entity.
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            status: None,
            vendor_type: None,
            limit: None,
            offset: None,
        }
    }

    /// Filters by status.
    pub fn status(mut self, status: VendorStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by vendor type.
    pub fn vendor_type(mut self, vendor_type: VendorType) -> Self {
        self.vendor_type = Some(vendor_type);
        self
    }

    /// Limits the number of vendors returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many vendors before returning results.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_for_entity_has_no_filters() {
        let entity = EntityId::new();
        let query = VendorQuery::for_entity(entity);

        assert_eq!(query.entity_id, entity);
        assert!(query.status.is_none());
        assert!(query.vendor_type.is_none());
        assert!(query.limit.is_none());
    }

    #[test]
    fn query_builder_chain() {
        let query = VendorQuery::for_entity(EntityId::new())
            .status(VendorStatus::Active)
            .vendor_type(VendorType::Utility)
            .limit(25)
            .offset(50);

        assert_eq!(query.status, Some(VendorStatus::Active));
        assert_eq!(query.vendor_type, Some(VendorType::Utility));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.offset, Some(50));
    }
}
