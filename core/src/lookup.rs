use tracing::{debug, warn};

use crate::client::PropertyMappingsApi;
use crate::error::{LookupError, Result};
use crate::model::filter::{FilterSet, LookupResult};
use crate::model::query::LdapListQuery;

/// Builds the list query for a [FilterSet]. A non-empty `managed_list` takes
/// precedence over `managed`; `name` and `object_field` are added independently.
pub fn build_query(filters: &FilterSet) -> LdapListQuery {
    let mut query = LdapListQuery::default();

    if let Some(managed_list) = filters.managed_list.as_ref().filter(|l| !l.is_empty()) {
        query = query.with_managed(managed_list.clone());
    } else if let Some(managed) = &filters.managed {
        query = query.with_managed(vec![managed.clone()]);
    }

    if let Some(name) = &filters.name {
        query = query.with_name(name.as_str());
    }
    if let Some(object_field) = &filters.object_field {
        query = query.with_object_field(object_field.as_str());
    }
    query
}

/// Looks up LDAP property mappings with a single request.
///
/// In batch mode (a non-empty `managed_list`) every matching id is returned in the
/// order the service listed them. Otherwise the first match is returned and any
/// further matches are dropped. No matches at all is always an error, in both modes.
/// Request failures are returned untouched and nothing is retried.
pub async fn read_ldap_property_mapping(
    api: &dyn PropertyMappingsApi,
    filters: &FilterSet,
) -> Result<LookupResult> {
    let query = build_query(filters);
    debug!("Looking up LDAP property mappings with {query:?}");

    let page = api.list_ldap(&query).await?;
    let Some(first) = page.results.first() else {
        return Err(LookupError::NoMatch);
    };

    if filters.is_batch() {
        debug!("Got {} mappings for managed list", page.results.len());
        return Ok(LookupResult::batch(&page.results));
    }

    if page.results.len() > 1 {
        warn!(
            "{} LDAP property mappings matched, using the first one ({}) and ignoring the rest",
            page.results.len(),
            first.pk
        );
    }
    Ok(LookupResult::single(first))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::client::PropertyMappingsApi;
    use crate::error::{LookupError, RequestFailure, Result};
    use crate::model::filter::{FilterSet, LookupResult, BATCH_ID};
    use crate::model::mappings::{LdapPropertyMapping, PaginatedLdapPropertyMappingList};
    use crate::model::query::LdapListQuery;

    use super::{build_query, read_ldap_property_mapping};

    /// Answers with a canned page (or failure) and remembers every query it was sent.
    struct CannedApi {
        response: std::result::Result<Vec<LdapPropertyMapping>, RequestFailure>,
        seen: Mutex<Vec<LdapListQuery>>,
    }

    impl CannedApi {
        fn returning(results: Vec<LdapPropertyMapping>) -> Self {
            Self {
                response: Ok(results),
                seen: Mutex::new(vec![]),
            }
        }

        fn failing(failure: RequestFailure) -> Self {
            Self {
                response: Err(failure),
                seen: Mutex::new(vec![]),
            }
        }

        fn queries(&self) -> Vec<LdapListQuery> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PropertyMappingsApi for CannedApi {
        async fn list_ldap(
            &self,
            query: &LdapListQuery,
        ) -> Result<PaginatedLdapPropertyMappingList> {
            self.seen.lock().unwrap().push(query.clone());
            match &self.response {
                Ok(results) => Ok(PaginatedLdapPropertyMappingList {
                    results: results.clone(),
                    ..Default::default()
                }),
                Err(failure) => Err(failure.clone().into()),
            }
        }
    }

    fn mapping(pk: &str, name: &str, expression: &str, object_field: &str) -> LdapPropertyMapping {
        LdapPropertyMapping {
            pk: pk.to_string(),
            managed: None,
            name: name.to_string(),
            expression: expression.to_string(),
            object_field: object_field.to_string(),
            component: None,
            verbose_name: None,
            verbose_name_plural: None,
            meta_model_name: None,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batch_mode() -> Result<()> {
        let api = CannedApi::returning(vec![
            mapping("p1", "a", "return {}", "cn"),
            mapping("p2", "b", "return {}", "mail"),
        ]);
        let filters = FilterSet {
            managed_list: Some(strings(&["a", "b"])),
            ..Default::default()
        };

        let result = read_ldap_property_mapping(&api, &filters).await?;

        assert_eq!(result.id(), BATCH_ID);
        assert_eq!(
            result,
            LookupResult::Batch {
                ids: strings(&["p1", "p2"])
            }
        );
        assert_eq!(
            api.queries(),
            vec![LdapListQuery::default().with_managed(strings(&["a", "b"]))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_mode_keeps_response_order() -> Result<()> {
        let api = CannedApi::returning(vec![
            mapping("z", "", "", ""),
            mapping("a", "", "", ""),
            mapping("m", "", "", ""),
        ]);
        let filters = FilterSet {
            managed_list: Some(strings(&["x"])),
            ..Default::default()
        };

        match read_ldap_property_mapping(&api, &filters).await? {
            LookupResult::Batch { ids } => assert_eq!(ids, strings(&["z", "a", "m"])),
            other => panic!("expected batch result, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_single_mode() -> Result<()> {
        let api = CannedApi::returning(vec![mapping("p1", "ldap-mapping-1", "user.name", "cn")]);
        let filters = FilterSet {
            name: Some("ldap-mapping-1".into()),
            ..Default::default()
        };

        let result = read_ldap_property_mapping(&api, &filters).await?;

        assert_eq!(result.id(), "p1");
        assert_eq!(
            result,
            LookupResult::Single {
                id: "p1".into(),
                name: "ldap-mapping-1".into(),
                expression: "user.name".into(),
                object_field: "cn".into(),
            }
        );
        assert_eq!(
            api.queries(),
            vec![LdapListQuery::default().with_name("ldap-mapping-1")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_single_mode_takes_first_match() -> Result<()> {
        let api = CannedApi::returning(vec![
            mapping("p1", "first", "one", "cn"),
            mapping("p2", "second", "two", "mail"),
        ]);
        let filters = FilterSet {
            managed: Some("goauthentik.io/sources/ldap/default-name".into()),
            ..Default::default()
        };

        let result = read_ldap_property_mapping(&api, &filters).await?;
        assert_eq!(result, LookupResult::single(&mapping("p1", "first", "one", "cn")));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_match() {
        for filters in [
            FilterSet {
                name: Some("does-not-exist".into()),
                ..Default::default()
            },
            FilterSet {
                managed_list: Some(strings(&["a"])),
                ..Default::default()
            },
        ] {
            let api = CannedApi::returning(vec![]);
            let err = read_ldap_property_mapping(&api, &filters)
                .await
                .unwrap_err();
            assert!(matches!(err, LookupError::NoMatch), "got {err:?}");
            assert_eq!(api.queries().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_request_failure_is_passed_through() {
        let failure = RequestFailure::response(500, "boom", "500 Internal Server Error");
        let api = CannedApi::failing(failure.clone());
        let filters = FilterSet {
            managed_list: Some(strings(&["a"])),
            ..Default::default()
        };

        let err = read_ldap_property_mapping(&api, &filters)
            .await
            .unwrap_err();
        match err {
            LookupError::Request(r) => assert_eq!(r, failure),
            _ => panic!("expected request failure, got {err:?}"),
        }
        assert_eq!(api.queries().len(), 1);
    }

    #[test]
    fn test_query_without_managed_filters() {
        let query = build_query(&FilterSet {
            name: Some("n".into()),
            object_field: Some("cn".into()),
            ..Default::default()
        });
        assert_eq!(query.managed, None);
        assert_eq!(query.name.as_deref(), Some("n"));
        assert_eq!(query.object_field.as_deref(), Some("cn"));

        assert_eq!(build_query(&FilterSet::default()), LdapListQuery::default());
    }

    #[test]
    fn test_managed_list_wins_over_managed() {
        let query = build_query(&FilterSet {
            managed: Some("c".into()),
            managed_list: Some(strings(&["a", "b"])),
            ..Default::default()
        });
        assert_eq!(query.managed, Some(strings(&["a", "b"])));
    }

    #[test]
    fn test_empty_managed_list_falls_back_to_managed() {
        let query = build_query(&FilterSet {
            managed: Some("c".into()),
            managed_list: Some(vec![]),
            ..Default::default()
        });
        assert_eq!(query.managed, Some(strings(&["c"])));
    }
}
