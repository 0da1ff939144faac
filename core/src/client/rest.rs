use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Certificate, Client};
use tracing::debug;
use url::Url;

use crate::conf::EnvConfigSettings;
use crate::error::{LookupError, RequestFailure, Result};
use crate::model::mappings::PaginatedLdapPropertyMappingList;
use crate::model::query::LdapListQuery;

use super::PropertyMappingsApi;

const LDAP_MAPPINGS_PATH: &str = "api/v3/propertymappings/ldap/";

/// [PropertyMappingsApi] over the authentik REST API. Cloning is cheap and clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    client: Client,
}

impl RestClient {
    /// `client` is expected to already carry authentication headers.
    pub fn new(base_url: &str, client: Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, client })
    }

    pub fn try_from_conf(conf: &EnvConfigSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", conf.token))
            .map_err(|_| LookupError::Config("AUTHENTIK_TOKEN is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in &conf.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| LookupError::Config(format!("invalid header name {key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| LookupError::Config(format!("invalid value for header {key}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .danger_accept_invalid_certs(conf.insecure);

        if let Some(pem) = conf.read_ca_cert()? {
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| LookupError::Config(format!("Could not parse ca cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| LookupError::Internal(format!("http client build error: {e}")))?;
        Self::new(&conf.url, client)
    }

    pub fn list_ldap_url(&self, query: &LdapListQuery) -> Result<Url> {
        let mut url = self.base_url.join(LDAP_MAPPINGS_PATH)?;
        let pairs = query.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

#[async_trait]
impl PropertyMappingsApi for RestClient {
    async fn list_ldap(&self, query: &LdapListQuery) -> Result<PaginatedLdapPropertyMappingList> {
        let url = self.list_ldap_url(query)?;
        debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RequestFailure::transport(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| RequestFailure {
            status: Some(status.as_u16()),
            body: None,
            message: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(RequestFailure::response(status.as_u16(), body, status.to_string()).into());
        }

        serde_json::from_str(&body).map_err(|e| {
            RequestFailure::response(
                status.as_u16(),
                body.clone(),
                format!("Unable to decode response: {e}"),
            )
            .into()
        })
    }
}
