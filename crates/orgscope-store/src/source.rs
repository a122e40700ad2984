//! The boundary to the tenant-scoped node store.
//!
//! Implementations answer lookups; they are not trusted to filter by tenant.
//! A missing row is `Ok(None)`, a store failure is `Err`.

use crate::memory::MemoryStore;
use async_trait::async_trait;
use orgscope_kernel::{Company, CompanyId, HierarchyError, Level, Node, NodeId, TenantTree};

#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Fetch the node `id` at `level`.
    async fn fetch_node(&self, level: Level, id: NodeId) -> Result<Option<Node>, HierarchyError>;

    /// Fetch a company by id.
    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, HierarchyError>;

    /// Fetch the full tree below a company.
    async fn fetch_tree(&self, company: &CompanyId) -> Result<Option<TenantTree>, HierarchyError>;
}

#[async_trait]
impl NodeSource for MemoryStore {
    async fn fetch_node(&self, level: Level, id: NodeId) -> Result<Option<Node>, HierarchyError> {
        Ok(self.node(level, id).cloned())
    }

    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, HierarchyError> {
        Ok(self.company(id).cloned())
    }

    async fn fetch_tree(&self, company: &CompanyId) -> Result<Option<TenantTree>, HierarchyError> {
        if self.company(company).is_none() {
            return Ok(None);
        }
        self.tenant_tree(company)
            .map(Some)
            .map_err(|e| HierarchyError::Storage(e.to_string()))
    }
}

#[async_trait]
impl<S: NodeSource + ?Sized> NodeSource for std::sync::Arc<S> {
    async fn fetch_node(&self, level: Level, id: NodeId) -> Result<Option<Node>, HierarchyError> {
        (**self).fetch_node(level, id).await
    }

    async fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, HierarchyError> {
        (**self).fetch_company(id).await
    }

    async fn fetch_tree(&self, company: &CompanyId) -> Result<Option<TenantTree>, HierarchyError> {
        (**self).fetch_tree(company).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgscope_kernel::{HierarchyRow, ParentRef};
    use std::sync::Arc;

    fn store() -> MemoryStore {
        MemoryStore::from_rows(vec![
            HierarchyRow::Company(Company {
                id: CompanyId::new("acme"),
                name: "Acme".to_string(),
            }),
            HierarchyRow::Node(Node::new(
                1,
                Level::BusinessUnit,
                ParentRef::Company(CompanyId::new("acme")),
                "West",
            )),
        ])
        .expect("store should build")
    }

    #[tokio::test]
    async fn memory_store_answers_lookups() {
        let store = store();
        let unit = store
            .fetch_node(Level::BusinessUnit, NodeId(1))
            .await
            .expect("lookup should succeed");
        assert_eq!(unit.map(|n| n.name), Some("West".to_string()));

        let missing = store
            .fetch_node(Level::Region, NodeId(1))
            .await
            .expect("lookup should succeed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn missing_company_has_no_tree() {
        let store = store();
        let tree = store
            .fetch_tree(&CompanyId::new("globex"))
            .await
            .expect("lookup should succeed");
        assert!(tree.is_none());

        let tree = store
            .fetch_tree(&CompanyId::new("acme"))
            .await
            .expect("lookup should succeed")
            .expect("acme has a tree");
        assert_eq!(tree.node_count(), 1);
    }

    #[tokio::test]
    async fn shared_store_delegates() {
        let shared = Arc::new(store());
        let company = shared
            .fetch_company(&CompanyId::new("acme"))
            .await
            .expect("lookup should succeed");
        assert_eq!(company.map(|c| c.name), Some("Acme".to_string()));
    }
}
