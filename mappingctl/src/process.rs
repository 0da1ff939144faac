use std::path::PathBuf;

use clap::Args;
use propmap::client::rest::RestClient;
use propmap::conf::EnvConfigSettings;
use propmap::error::{LookupError, Result};
use propmap::lookup::read_ldap_property_mapping;
use propmap::model::filter::FilterSet;
use propmap::schema::{MANAGED, MANAGED_LIST, NAME, OBJECT_FIELD};
use serde_json::{Map, Value};
use tracing::info;

/// Filters given on the command line. Any flag that is set replaces the same
/// attribute from the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    #[clap(long, default_value = None)]
    name: Option<String>,
    #[clap(long, default_value = None)]
    managed: Option<String>,
    /// May be repeated or comma separated
    #[clap(long, value_delimiter = ',')]
    managed_list: Vec<String>,
    #[clap(long, default_value = None)]
    object_field: Option<String>,
}

impl FilterArgs {
    fn apply(self, config: Value) -> Result<Value> {
        let mut block = match config {
            Value::Object(block) => block,
            Value::Null => Map::new(),
            other => {
                return Err(LookupError::InvalidConfig(format!(
                    "data source configuration must be an object, got {other}"
                )))
            }
        };
        if let Some(name) = self.name {
            block.insert(NAME.into(), name.into());
        }
        if let Some(managed) = self.managed {
            block.insert(MANAGED.into(), managed.into());
        }
        if !self.managed_list.is_empty() {
            block.insert(MANAGED_LIST.into(), self.managed_list.into());
        }
        if let Some(object_field) = self.object_field {
            block.insert(OBJECT_FIELD.into(), object_field.into());
        }
        Ok(Value::Object(block))
    }
}

/// Reads a data source block from a YAML or JSON file.
fn read_config_file(path: &std::path::Path) -> Result<Value> {
    let f = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(f);
    serde_yaml::from_reader(reader).map_err(|e| {
        LookupError::SerDe(format!(
            "Unable to deserialize data source block from file {} with error {e}",
            path.to_string_lossy()
        ))
    })
}

pub(crate) fn resolve_filters(config: Option<PathBuf>, args: FilterArgs) -> Result<FilterSet> {
    let block = match config {
        Some(path) => read_config_file(&path)?,
        None => Value::Null,
    };
    FilterSet::from_config(&args.apply(block)?)
}

/// Runs one lookup against the configured authentik instance and returns the
/// resulting data source state.
pub(crate) async fn run(config: Option<PathBuf>, args: FilterArgs) -> Result<Value> {
    let filters = resolve_filters(config, args)?;
    let env_conf = EnvConfigSettings::try_init()?;
    let client = RestClient::try_from_conf(&env_conf)?;

    let result = read_ldap_property_mapping(&client, &filters).await?;
    info!("Lookup resolved to id {}", result.id());
    Ok(result.to_state(&filters))
}
