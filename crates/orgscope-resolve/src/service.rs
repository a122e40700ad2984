//! Hierarchy queries for pickers and access checks.
//!
//! Glues a [`NodeSource`], the [`AncestorResolver`] and the kernel's
//! flattening under one configuration. Every call takes the tenant
//! explicitly and is independent of every other call.

use crate::resolver::{AncestorChain, AncestorResolver};
use orgscope_kernel::{
    FlattenedNodeEntry, FlattenedRoleEntry, HierarchyConfig, HierarchyError, Level,
    LocationSelection, NodeId, ProgramScope, TenantId, TenantTree, flatten_level, flatten_roles,
    search_roles,
};
use orgscope_store::NodeSource;

#[derive(Debug, Clone)]
pub struct HierarchyService<S> {
    resolver: AncestorResolver<S>,
    config: HierarchyConfig,
}

impl<S: NodeSource> HierarchyService<S> {
    pub fn new(source: S, config: HierarchyConfig) -> Self {
        Self {
            resolver: AncestorResolver::new(source),
            config,
        }
    }

    pub fn resolver(&self) -> &AncestorResolver<S> {
        &self.resolver
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    pub async fn resolve_ancestors(
        &self,
        node_id: NodeId,
        level: Level,
        tenant: &TenantId,
    ) -> Result<LocationSelection, HierarchyError> {
        self.resolver
            .resolve_ancestors(node_id, level, tenant)
            .await
    }

    /// Breadcrumb for a node, using the configured separator.
    pub async fn breadcrumb(
        &self,
        node_id: NodeId,
        level: Level,
        tenant: &TenantId,
    ) -> Result<String, HierarchyError> {
        let chain: AncestorChain = self.resolver.resolve_chain(node_id, level, tenant).await?;
        Ok(chain.display_path(&self.config.flatten.path_separator))
    }

    /// The tenant's full tree.
    ///
    /// The store is not trusted to have answered for the right company, so
    /// the tree's root is checked against `tenant`.
    pub async fn tenant_tree(&self, tenant: &TenantId) -> Result<TenantTree, HierarchyError> {
        let tree = self
            .resolver
            .source()
            .fetch_tree(tenant)
            .await?
            .ok_or_else(|| HierarchyError::not_found(Level::Company, tenant))?;
        if &tree.company_id != tenant {
            tracing::warn!(
                tenant = %tenant,
                "node store returned a tree for a different company"
            );
            return Err(HierarchyError::TenantMismatch {
                expected: tenant.to_string(),
                actual: tree.company_id.to_string(),
            });
        }
        Ok(tree)
    }

    /// Every role of the tenant, flattened for a role picker.
    pub async fn role_entries(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<FlattenedRoleEntry>, HierarchyError> {
        let tree = self.tenant_tree(tenant).await?;
        let entries = flatten_roles(&tree, &self.config.flatten.path_separator);
        tracing::debug!(tenant = %tenant, roles = entries.len(), "flattened role tree");
        Ok(entries)
    }

    /// Every node at `level`, flattened for a location picker.
    pub async fn location_entries(
        &self,
        tenant: &TenantId,
        level: Level,
    ) -> Result<Vec<FlattenedNodeEntry>, HierarchyError> {
        if !level.is_resolvable() {
            return Err(HierarchyError::InvalidLevel(format!(
                "{level} is not a pickable location"
            )));
        }
        let tree = self.tenant_tree(tenant).await?;
        Ok(flatten_level(
            &tree,
            level,
            &self.config.flatten.path_separator,
        ))
    }

    /// Roles matching `query`, capped at the configured search limit.
    pub async fn search_roles(
        &self,
        tenant: &TenantId,
        query: &str,
    ) -> Result<Vec<FlattenedRoleEntry>, HierarchyError> {
        let entries = self.role_entries(tenant).await?;
        Ok(search_roles(&entries, query, self.config.search.limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Whether a node falls inside a program's scope.
    ///
    /// The node is resolved for `tenant` first, so a foreign or missing node
    /// fails instead of answering `false`. A node above the scope level is
    /// never covered by a narrower scope.
    pub async fn scope_covers(
        &self,
        scope: &ProgramScope,
        node_id: NodeId,
        level: Level,
        tenant: &TenantId,
    ) -> Result<bool, HierarchyError> {
        let selection = self
            .resolver
            .resolve_ancestors(node_id, level, tenant)
            .await?;
        if scope.is_company_wide() {
            return Ok(true);
        }
        Ok(selection
            .get(scope.scope_level)
            .is_some_and(|id| scope.covers(scope.scope_level, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgscope_kernel::{Company, CompanyId, HierarchyRow, Node, ParentRef};
    use orgscope_store::MemoryStore;

    fn acme() -> TenantId {
        CompanyId::new("acme")
    }

    fn service(config: HierarchyConfig) -> HierarchyService<MemoryStore> {
        let mut rows = vec![
            HierarchyRow::Company(Company {
                id: acme(),
                name: "Acme".to_string(),
            }),
            HierarchyRow::Company(Company {
                id: CompanyId::new("globex"),
                name: "Globex".to_string(),
            }),
            HierarchyRow::Node(Node::new(
                1,
                Level::BusinessUnit,
                ParentRef::Company(acme()),
                "West",
            )),
            HierarchyRow::Node(Node::new(
                9,
                Level::BusinessUnit,
                ParentRef::Company(CompanyId::new("globex")),
                "North",
            )),
        ];
        let chain = [
            (2, Level::Region, 1, "Pilbara"),
            (3, Level::Site, 2, "Mine A"),
            (31, Level::Site, 2, "Mine B"),
            (4, Level::AssetGroup, 3, "Crushers"),
            (5, Level::WorkGroup, 4, "Maintenance"),
            (42, Level::Role, 5, "Technician"),
            (43, Level::Role, 5, "Fitter"),
        ];
        for (id, level, parent, name) in chain {
            rows.push(HierarchyRow::Node(Node::new(
                id,
                level,
                ParentRef::Node(NodeId(parent)),
                name,
            )));
        }
        let store = MemoryStore::from_rows(rows).expect("store should build");
        HierarchyService::new(store, config)
    }

    async fn covers(
        service: &HierarchyService<MemoryStore>,
        scope: &ProgramScope,
        id: i64,
        level: Level,
    ) -> bool {
        service
            .scope_covers(scope, NodeId(id), level, &acme())
            .await
            .expect("acme node should resolve")
    }

    #[tokio::test]
    async fn role_entries_use_configured_separator() {
        let config = HierarchyConfig::from_toml_str("[flatten]\npath_separator = \" / \"\n")
            .expect("config should parse");
        let entries = service(config)
            .role_entries(&acme())
            .await
            .expect("roles should flatten");
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].path,
            "West / Pilbara / Mine A / Crushers / Maintenance"
        );
    }

    #[tokio::test]
    async fn tenant_without_roles_flattens_to_nothing() {
        let entries = service(HierarchyConfig::default())
            .role_entries(&CompanyId::new("globex"))
            .await
            .expect("globex tree should flatten");
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let err = service(HierarchyConfig::default())
            .role_entries(&CompanyId::new("initech"))
            .await
            .expect_err("unknown tenant must fail");
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn location_entries_list_one_level() {
        let service = service(HierarchyConfig::default());
        let sites = service
            .location_entries(&acme(), Level::Site)
            .await
            .expect("sites should flatten");
        let names: Vec<&str> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mine A", "Mine B"]);
        assert_eq!(sites[0].path, "West > Pilbara");

        let err = service
            .location_entries(&acme(), Level::Company)
            .await
            .expect_err("company is not a location");
        assert!(matches!(err, HierarchyError::InvalidLevel(_)));
    }

    #[tokio::test]
    async fn search_respects_configured_limit() {
        let config =
            HierarchyConfig::from_toml_str("[search]\nlimit = 1\n").expect("config should parse");
        let service = service(config);
        let hits = service
            .search_roles(&acme(), "maintenance")
            .await
            .expect("search should run");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Technician");
    }

    #[tokio::test]
    async fn breadcrumb_includes_the_node() {
        let crumb = service(HierarchyConfig::default())
            .breadcrumb(NodeId(3), Level::Site, &acme())
            .await
            .expect("breadcrumb should resolve");
        assert_eq!(crumb, "West > Pilbara > Mine A");
    }

    #[tokio::test]
    async fn scope_covers_nodes_below_selected_site() {
        let service = service(HierarchyConfig::default());
        let site = ProgramScope::new(Level::Site, [NodeId(3)]).expect("site is a scope level");
        let everywhere = ProgramScope::company_wide();

        assert!(covers(&service, &site, 42, Level::Role).await);
        assert!(!covers(&service, &site, 31, Level::Site).await);
        assert!(!covers(&service, &site, 2, Level::Region).await);
        assert!(covers(&service, &everywhere, 2, Level::Region).await);
    }

    #[tokio::test]
    async fn scope_check_fails_for_foreign_nodes() {
        let service = service(HierarchyConfig::default());
        let everywhere = ProgramScope::company_wide();
        let err = service
            .scope_covers(&everywhere, NodeId(9), Level::BusinessUnit, &acme())
            .await
            .expect_err("foreign unit must fail");
        assert!(matches!(err, HierarchyError::TenantMismatch { .. }));
    }
}
