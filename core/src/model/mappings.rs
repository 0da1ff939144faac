use serde::{Deserialize, Serialize};

/// An LDAP property mapping as returned by the authentik API. Maps an LDAP
/// attribute onto an object field through a python `expression`. Only `pk`,
/// `name`, `expression` and `object_field` are used by the lookup, the rest is kept
/// so a full record can be inspected when debugging.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct LdapPropertyMapping {
    /// Server assigned identifier
    pub pk: String,
    /// Set when the mapping is managed by authentik itself, e.g.
    /// "goauthentik.io/sources/ldap/default-name"
    #[serde(default)]
    pub managed: Option<String>,
    pub name: String,
    pub expression: String,
    pub object_field: String,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub verbose_name_plural: Option<String>,
    #[serde(default)]
    pub meta_model_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct Pagination {
    #[serde(default)]
    pub next: Option<f64>,
    #[serde(default)]
    pub previous: Option<f64>,
    #[serde(default)]
    pub count: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub total_pages: f64,
    #[serde(default)]
    pub start_index: f64,
    #[serde(default)]
    pub end_index: f64,
}

/// One page of the `propertymappings/ldap/` list endpoint. Results are kept in the
/// order the service returned them.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct PaginatedLdapPropertyMappingList {
    #[serde(default)]
    pub pagination: Pagination,
    pub results: Vec<LdapPropertyMapping>,
}
