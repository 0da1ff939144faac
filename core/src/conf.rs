use crate::error::{LookupError, Result};
use std::{collections::HashMap, env, io::Read};

/// Initializes and Holds envrionment variable settings which
/// control how the remote authentik API is reached.
#[derive(Debug, Clone)]
pub struct EnvConfigSettings {
    pub url: String,
    pub token: String,
    /// Skip TLS certificate verification
    pub insecure: bool,
    pub ca_cert_file: Option<String>,
    /// Extra headers added to every request
    pub headers: HashMap<String, String>,
}

impl EnvConfigSettings {
    /// Same as [EnvConfigSettings::try_init] but panics if any required setting
    /// is missing or invalid.
    pub fn init() -> Self {
        Self::try_init().unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_init() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from any key -> value source. Empty values are treated
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let url = var("AUTHENTIK_URL")
            .ok_or(LookupError::Config("AUTHENTIK_URL must be set".into()))?;
        let token = var("AUTHENTIK_TOKEN")
            .ok_or(LookupError::Config("AUTHENTIK_TOKEN must be set".into()))?;

        let insecure = var("AUTHENTIK_INSECURE")
            .unwrap_or("false".to_string())
            .parse::<bool>()
            .map_err(|_| {
                LookupError::Config("Unable to parse AUTHENTIK_INSECURE as boolean!".into())
            })?;

        let ca_cert_file = var("AUTHENTIK_CA_CERT_FILE");

        let headers = match var("AUTHENTIK_HEADERS") {
            Some(raw) => serde_json::from_str(raw.as_str()).map_err(|e| {
                LookupError::Config(format!(
                    "AUTHENTIK_HEADERS could not be parsed as a json object of strings: {e}"
                ))
            })?,
            None => HashMap::new(),
        };

        Ok(Self {
            url,
            token,
            insecure,
            ca_cert_file,
            headers,
        })
    }

    /// Reads the extra root certificate pem file, if one was configured
    pub fn read_ca_cert(&self) -> Result<Option<Vec<u8>>> {
        match &self.ca_cert_file {
            Some(path) => {
                let mut buf = Vec::new();
                std::fs::File::open(path)?.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            None => Ok(None),
        }
    }
}
