//! Declares the attributes of the LDAP property mapping data source as the
//! configuration engine sees them, and validates raw configuration blocks against
//! that declaration before anything typed is read out of them.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LookupError, Result};

pub const NAME: &str = "name";
pub const MANAGED: &str = "managed";
pub const MANAGED_LIST: &str = "managed_list";
pub const IDS: &str = "ids";
pub const OBJECT_FIELD: &str = "object_field";
pub const EXPRESSION: &str = "expression";
pub const ID: &str = "id";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    StringList,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    /// May be set in configuration
    pub optional: bool,
    /// Filled in by the read
    pub computed: bool,
    #[serde(skip_serializing_if = "no_conflicts")]
    pub conflicts_with: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

fn no_conflicts(c: &&'static [&'static str]) -> bool {
    c.is_empty()
}

impl Attribute {
    fn new(name: &'static str, ty: AttributeType) -> Self {
        Self {
            name,
            ty,
            optional: false,
            computed: false,
            conflicts_with: &[],
            description: None,
        }
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    fn conflicts_with(mut self, others: &'static [&'static str]) -> Self {
        self.conflicts_with = others;
        self
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn matches_type(&self, value: &Value) -> bool {
        match self.ty {
            AttributeType::String => value.is_string(),
            AttributeType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DataSourceSchema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl DataSourceSchema {
    pub fn ldap_property_mapping() -> Self {
        Self {
            description: "Get LDAP Property mappings",
            attributes: vec![
                Attribute::new(NAME, AttributeType::String)
                    .optional()
                    .conflicts_with(&[MANAGED_LIST]),
                Attribute::new(MANAGED, AttributeType::String).optional(),
                Attribute::new(MANAGED_LIST, AttributeType::StringList)
                    .optional()
                    .describe("Retrive multiple property mappings"),
                Attribute::new(IDS, AttributeType::StringList)
                    .optional()
                    .computed()
                    .describe("List of ids when `managed_list` is set."),
                Attribute::new(OBJECT_FIELD, AttributeType::String).optional().computed(),
                Attribute::new(EXPRESSION, AttributeType::String).computed(),
            ],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks a raw configuration block. `null` is accepted as an empty block and
    /// `null` attribute values count as unset.
    pub fn validate(&self, config: &Value) -> Result<()> {
        let empty = Map::new();
        let block = as_block(config, &empty)?;

        for (key, value) in block {
            let attribute = self.attribute(key).ok_or(LookupError::InvalidConfig(format!(
                "unknown attribute `{key}`"
            )))?;
            if value.is_null() {
                continue;
            }
            if !attribute.optional {
                return Err(LookupError::InvalidConfig(format!(
                    "`{key}` is computed and cannot be set"
                )));
            }
            if !attribute.matches_type(value) {
                return Err(LookupError::InvalidConfig(format!(
                    "`{key}` must be of type {:?}, got {value}",
                    attribute.ty
                )));
            }
        }

        for attribute in &self.attributes {
            if !is_set(block, attribute.name) {
                continue;
            }
            if let Some(other) = attribute
                .conflicts_with
                .iter()
                .find(|other| is_set(block, other))
            {
                return Err(LookupError::InvalidConfig(format!(
                    "`{}` conflicts with `{other}`, only one of them may be set",
                    attribute.name
                )));
            }
        }

        Ok(())
    }
}

fn as_block<'a>(config: &'a Value, empty: &'a Map<String, Value>) -> Result<&'a Map<String, Value>> {
    match config {
        Value::Object(block) => Ok(block),
        Value::Null => Ok(empty),
        other => Err(LookupError::InvalidConfig(format!(
            "data source configuration must be an object, got {other}"
        ))),
    }
}

fn is_set(block: &Map<String, Value>, key: &str) -> bool {
    block.get(key).is_some_and(|v| !v.is_null())
}

/// Reads a string attribute. Unset, `null` and empty strings are all treated as absent.
pub fn get_string(config: &Value, key: &str) -> Option<String> {
    config
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads a list of strings attribute. Unset, `null` and empty lists are all treated
/// as absent.
pub fn get_string_list(config: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = config
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
