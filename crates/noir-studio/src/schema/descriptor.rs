//! Field-level schema descriptors.
//!
//! A [`SchemaDescriptor`] is the single source of truth for one Result Type:
//! the prompt compiler reads it to describe the expected output, the
//! completion client sends its JSON-schema rendering to constrain decoding,
//! and the renderer walks it to lay out display panels.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::schema::Feature;

/// Declared item count for a list field.
///
/// The bounds are stated in the prompt and in the schema sent to the model.
/// The contract layer never checks them on the way back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cardinality {
    pub min: u32,
    pub max: u32,
}

impl Cardinality {
    /// Human-readable count, e.g. `"exactly 3"` or `"4 to 6"`.
    pub fn describe(&self) -> String {
        if self.min == self.max {
            format!("exactly {}", self.min)
        } else {
            format!("{} to {}", self.min, self.max)
        }
    }
}

/// Shape of a single field.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    StringList {
        #[serde(skip_serializing_if = "Option::is_none")]
        cardinality: Option<Cardinality>,
    },
    RecordList {
        fields: &'static [FieldSpec],
        #[serde(skip_serializing_if = "Option::is_none")]
        cardinality: Option<Cardinality>,
    },
    Record {
        fields: &'static [FieldSpec],
    },
}

impl FieldKind {
    /// Short label used in prompt instructions.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::StringList { .. } => "list of strings",
            FieldKind::RecordList { .. } => "list of objects",
            FieldKind::Record { .. } => "object",
        }
    }

    /// Nested fields for record-shaped kinds.
    pub fn nested_fields(&self) -> Option<&'static [FieldSpec]> {
        match self {
            FieldKind::RecordList { fields, .. } | FieldKind::Record { fields } => Some(*fields),
            _ => None,
        }
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            FieldKind::StringList { cardinality } | FieldKind::RecordList { cardinality, .. } => {
                *cardinality
            }
            _ => None,
        }
    }
}

/// One named field of a Result Type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required: true,
            description,
        }
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            required: true,
            description,
        }
    }

    pub const fn string_list(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::StringList { cardinality: None },
            required: true,
            description,
        }
    }

    pub const fn record_list(
        name: &'static str,
        fields: &'static [FieldSpec],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::RecordList {
                fields,
                cardinality: None,
            },
            required: true,
            description,
        }
    }

    pub const fn record(
        name: &'static str,
        fields: &'static [FieldSpec],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Record { fields },
            required: true,
            description,
        }
    }

    /// Mark the field as optional. Consumers omit the section when absent.
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach a declared item count. No effect on scalar or record kinds.
    pub const fn between(mut self, min: u32, max: u32) -> Self {
        let cardinality = Some(Cardinality { min, max });
        self.kind = match self.kind {
            FieldKind::StringList { .. } => FieldKind::StringList { cardinality },
            FieldKind::RecordList { fields, .. } => FieldKind::RecordList {
                fields,
                cardinality,
            },
            other => other,
        };
        self
    }

    /// Whether this field, or any field nested under it, is optional.
    pub fn has_optional(&self) -> bool {
        !self.required
            || self
                .kind
                .nested_fields()
                .is_some_and(|fields| fields.iter().any(FieldSpec::has_optional))
    }

    /// JSON-schema fragment for this field.
    pub fn json_schema(&self) -> Value {
        let mut schema = match self.kind {
            FieldKind::String => json!({ "type": "string" }),
            FieldKind::Integer => json!({ "type": "integer" }),
            FieldKind::StringList { .. } => {
                json!({ "type": "array", "items": { "type": "string" } })
            }
            FieldKind::RecordList { fields, .. } => {
                json!({ "type": "array", "items": object_schema(fields) })
            }
            FieldKind::Record { fields } => object_schema(fields),
        };
        if let Some(card) = self.kind.cardinality() {
            schema["minItems"] = json!(card.min);
            schema["maxItems"] = json!(card.max);
        }
        if !self.description.is_empty() {
            schema["description"] = json!(self.description);
        }
        schema
    }
}

/// Object schema for a field list: properties in declared order, required
/// set to the non-optional fields, no additional properties.
pub fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), field.json_schema());
    }
    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Descriptor for one Result Type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SchemaDescriptor {
    pub feature: Feature,
    /// Type name, also used as the `json_schema.name` sent to the model.
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

impl SchemaDescriptor {
    /// Render the descriptor as a JSON schema object.
    pub fn json_schema(&self) -> Value {
        let mut schema = object_schema(self.fields);
        schema["title"] = json!(self.name);
        schema["description"] = json!(self.description);
        schema
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Top-level field names in declared order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn has_optional_fields(&self) -> bool {
        self.fields.iter().any(FieldSpec::has_optional)
    }
}
