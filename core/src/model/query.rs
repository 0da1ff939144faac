use serde::{Deserialize, Serialize};

/// Filters sent to the `propertymappings/ldap/` list endpoint. Built as a plain value
/// with the consuming `with_*` methods, then handed to a
/// [PropertyMappingsApi][crate::client::PropertyMappingsApi] once.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct LdapListQuery {
    /// Matches mappings whose `managed` value is any of these. A single managed
    /// value is sent as a list of one.
    pub managed: Option<Vec<String>>,
    pub name: Option<String>,
    pub object_field: Option<String>,
}

impl LdapListQuery {
    pub fn with_managed(self, managed: Vec<String>) -> Self {
        Self {
            managed: Some(managed),
            ..self
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn with_object_field(self, object_field: impl Into<String>) -> Self {
        Self {
            object_field: Some(object_field.into()),
            ..self
        }
    }

    /// Url query parameters in the order they should be sent. `managed` is repeated
    /// once per value.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![];
        if let Some(managed) = &self.managed {
            pairs.extend(managed.iter().map(|m| ("managed", m.as_str())));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.as_str()));
        }
        if let Some(object_field) = &self.object_field {
            pairs.push(("object_field", object_field.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::LdapListQuery;

    #[test]
    fn test_empty_query() {
        assert!(LdapListQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs() {
        let query = LdapListQuery::default()
            .with_managed(vec!["a".to_string(), "b".to_string()])
            .with_name("ldap-mapping-1")
            .with_object_field("cn");

        assert_eq!(
            query.query_pairs(),
            vec![
                ("managed", "a"),
                ("managed", "b"),
                ("name", "ldap-mapping-1"),
                ("object_field", "cn"),
            ]
        );
    }

    #[test]
    fn test_builder_keeps_previous_filters() {
        let base = LdapListQuery::default().with_name("n");
        let query = base.clone().with_object_field("cn");

        assert_eq!(base.object_field, None);
        assert_eq!(query.name.as_deref(), Some("n"));
        assert_eq!(query.object_field.as_deref(), Some("cn"));
    }
}
