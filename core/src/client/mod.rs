use crate::error::Result;
use crate::model::mappings::PaginatedLdapPropertyMappingList;
use crate::model::query::LdapListQuery;

use async_trait::async_trait;

pub mod rest;

/// The part of the authentik API the lookup needs. Implementations send exactly one
/// request per call and return the single page the service answers with.
#[async_trait]
pub trait PropertyMappingsApi: Send + Sync {
    /// Lists LDAP property mappings matching every filter set on `query`. Transport
    /// failures and non-success statuses come back as
    /// [LookupError::Request][crate::error::LookupError::Request].
    async fn list_ldap(&self, query: &LdapListQuery) -> Result<PaginatedLdapPropertyMappingList>;
}
