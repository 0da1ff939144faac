use itertools::Itertools;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::mappings::LdapPropertyMapping;
use crate::schema::{
    get_string, get_string_list, DataSourceSchema, EXPRESSION, ID, IDS, MANAGED, MANAGED_LIST,
    NAME, OBJECT_FIELD,
};

/// Identity given to a batch result, which does not stand for one remote mapping.
pub const BATCH_ID: &str = "-1";

/// The optional filters a caller may give to a lookup. `name` and `managed_list`
/// must not both be set; [FilterSet::from_config] rejects that, the lookup itself
/// does not check it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    pub name: Option<String>,
    pub managed: Option<String>,
    pub managed_list: Option<Vec<String>>,
    pub object_field: Option<String>,
}

impl FilterSet {
    /// Validates a raw data source configuration block and reads the filters out of
    /// it. Empty strings and empty lists count as unset.
    pub fn from_config(config: &Value) -> Result<Self> {
        DataSourceSchema::ldap_property_mapping().validate(config)?;
        Ok(Self {
            name: get_string(config, NAME),
            managed: get_string(config, MANAGED),
            managed_list: get_string_list(config, MANAGED_LIST),
            object_field: get_string(config, OBJECT_FIELD),
        })
    }

    /// Batch mode returns every matching id rather than one full mapping.
    pub fn is_batch(&self) -> bool {
        self.managed_list.as_ref().is_some_and(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The first mapping the service returned
    Single {
        id: String,
        name: String,
        expression: String,
        object_field: String,
    },
    /// Ids of every mapping the service returned, in response order
    Batch { ids: Vec<String> },
}

impl LookupResult {
    pub fn single(mapping: &LdapPropertyMapping) -> Self {
        LookupResult::Single {
            id: mapping.pk.clone(),
            name: mapping.name.clone(),
            expression: mapping.expression.clone(),
            object_field: mapping.object_field.clone(),
        }
    }

    pub fn batch<'a>(mappings: impl IntoIterator<Item = &'a LdapPropertyMapping>) -> Self {
        LookupResult::Batch {
            ids: mappings.into_iter().map(|m| m.pk.clone()).collect_vec(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LookupResult::Single { id, .. } => id,
            LookupResult::Batch { .. } => BATCH_ID,
        }
    }

    /// Renders the state the configuration engine stores for the data source: the
    /// filters that were set, the identity, and the computed attributes.
    pub fn to_state(&self, filters: &FilterSet) -> Value {
        let mut state = Map::new();
        if let Some(name) = &filters.name {
            state.insert(NAME.into(), name.clone().into());
        }
        if let Some(managed) = &filters.managed {
            state.insert(MANAGED.into(), managed.clone().into());
        }
        if let Some(managed_list) = &filters.managed_list {
            state.insert(MANAGED_LIST.into(), managed_list.clone().into());
        }
        if let Some(object_field) = &filters.object_field {
            state.insert(OBJECT_FIELD.into(), object_field.clone().into());
        }

        state.insert(ID.into(), self.id().into());
        match self {
            LookupResult::Single {
                name,
                expression,
                object_field,
                ..
            } => {
                state.insert(NAME.into(), name.clone().into());
                state.insert(EXPRESSION.into(), expression.clone().into());
                state.insert(OBJECT_FIELD.into(), object_field.clone().into());
            }
            LookupResult::Batch { ids } => {
                state.insert(IDS.into(), ids.clone().into());
            }
        }
        Value::Object(state)
    }
}
