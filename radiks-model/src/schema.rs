use crate::document::keys;
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Describes a record type: its name, its declared fields, and defaults.
///
/// Attributes not declared here are stored as plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    pub model_name: String,
    pub fields: Vec<FieldSpec>,
    /// Values applied to a freshly created record for absent attributes.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub defaults: Map<String, Value>,
}

impl ModelSchema {
    /// Starts an empty schema for `model_name`.
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.into(),
            fields: Vec::new(),
            defaults: Map::new(),
        }
    }

    /// Appends a field declaration.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declares a default value for an attribute.
    #[must_use]
    pub fn default_value(mut self, name: &str, value: Value) -> Self {
        self.defaults.insert(name.into(), value);
        self
    }

    /// Looks up a declared field.
    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is declared as an encrypted field.
    pub fn is_encrypted(&self, name: &str) -> bool {
        self.spec(name).is_some_and(FieldSpec::is_encrypted)
    }

    /// Iterates the encrypted field declarations in schema order.
    pub fn encrypted_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_encrypted())
    }

    /// Checks the definition for duplicate or reserved field names.
    pub fn validate_definition(&self) -> ModelResult<()> {
        let fail = |reason: String| ModelError::Schema {
            model: self.model_name.clone(),
            reason,
        };

        if self.model_name.is_empty() || self.model_name.contains('/') {
            return Err(fail(format!(
                "model name {:?} must be non-empty and contain no '/'",
                self.model_name
            )));
        }

        for (i, spec) in self.fields.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(fail("field names must not be empty".into()));
            }
            if keys::is_reserved(&spec.name) {
                return Err(fail(format!("field `{}` uses a reserved key", spec.name)));
            }
            if self.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(fail(format!("field `{}` is declared twice", spec.name)));
            }
        }

        for name in self.defaults.keys() {
            if keys::is_reserved(name) {
                return Err(fail(format!("default for reserved key `{name}`")));
            }
        }

        Ok(())
    }

    /// Checks that every declared field present in `attrs` has its declared type.
    ///
    /// `null` is accepted for any type and means "unset".
    pub fn validate_attrs(&self, attrs: &Map<String, Value>) -> ModelResult<()> {
        for spec in &self.fields {
            let Some(value) = attrs.get(&spec.name) else {
                continue;
            };
            if value.is_null() || spec.field_type.accepts(value) {
                continue;
            }
            return Err(ModelError::FieldType {
                field: spec.name.clone(),
                expected: spec.field_type.name(),
                actual: json_type_name(value),
            });
        }
        Ok(())
    }

    /// Inserts defaults for any attribute missing from `attrs`.
    pub fn apply_defaults(&self, attrs: &mut Map<String, Value>) {
        for (name, value) in &self.defaults {
            attrs.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }
}

/// A declared attribute of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub class: FieldClass,
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Shorthand for a field sealed before it leaves the client.
    pub fn encrypted(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            class: FieldClass::Encrypted,
            field_type,
        }
    }

    /// Shorthand for a cleartext, queryable field.
    pub fn plaintext(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            class: FieldClass::Plaintext,
            field_type,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.class == FieldClass::Encrypted
    }
}

/// Whether a field is stored in cleartext or sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    Plaintext,
    Encrypted,
}

/// The JSON type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// No type check.
    Any,
}

impl FieldType {
    /// Whether `value` is of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
