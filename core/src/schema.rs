//! Structured-output contract for trail suggestions.
//!
//! The descriptor sent to the model and the validator applied to the model's
//! reply are the same [`SchemaDescriptor`] value, built from
//! [`TRAIL_SUGGESTION_FIELDS`]. Adding or renaming a field happens there and
//! nowhere else.

use crate::errors::ErrorKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value types understood by the model's structured-output constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Array,
}

impl SchemaType {
    /// Whether a decoded JSON value has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            SchemaType::Object => value.is_object(),
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => value.is_i64() || value.is_u64(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Array => value.is_array(),
        }
    }
}

/// A single property of an object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One required field of the trail suggestion
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub schema_type: SchemaType,
    pub description: &'static str,
}

/// Required fields of a trail suggestion, in display order.
pub const TRAIL_SUGGESTION_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "trailName",
        schema_type: SchemaType::String,
        description: "A creative and plausible name for the trail.",
    },
    FieldSpec {
        name: "difficulty",
        schema_type: SchemaType::String,
        description: "The difficulty level (e.g., Easy, Moderate, Challenging).",
    },
    FieldSpec {
        name: "distance",
        schema_type: SchemaType::String,
        description: "The estimated length of the trail (e.g., '5 km loop').",
    },
    FieldSpec {
        name: "description",
        schema_type: SchemaType::String,
        description: "A one-paragraph, engaging description of the trail experience.",
    },
    FieldSpec {
        name: "whyItMatches",
        schema_type: SchemaType::String,
        description: "A short sentence explaining why this trail is a good match for the user's preferences.",
    },
];

/// Object schema in the form the model's `responseSchema` accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl SchemaDescriptor {
    /// Builds an object schema where every field is required.
    pub fn from_fields(fields: &[FieldSpec]) -> Self {
        let properties = fields
            .iter()
            .map(|field| {
                (
                    field.name.to_string(),
                    PropertySchema {
                        schema_type: field.schema_type,
                        description: Some(field.description.to_string()),
                    },
                )
            })
            .collect();
        let names: Vec<String> = fields.iter().map(|f| f.name.to_string()).collect();

        Self {
            schema_type: SchemaType::Object,
            properties,
            required: names.clone(),
            property_ordering: names,
        }
    }

    /// The trail suggestion contract.
    pub fn trail_suggestion() -> Self {
        Self::from_fields(&TRAIL_SUGGESTION_FIELDS)
    }

    /// Checks `text` against this schema and decodes it into `T`.
    ///
    /// Fails with `MalformedResponse` unless the text is a JSON object holding
    /// every required field with its declared type.
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ErrorKind> {
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| ErrorKind::MalformedResponse(format!("not valid JSON: {}", e)))?;

        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(ErrorKind::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        for name in &self.required {
            let field = match object.get(name) {
                None | Some(Value::Null) => {
                    return Err(ErrorKind::MalformedResponse(format!(
                        "missing required field '{}'",
                        name
                    )))
                }
                Some(field) => field,
            };

            if let Some(property) = self.properties.get(name) {
                if !property.schema_type.matches(field) {
                    return Err(ErrorKind::MalformedResponse(format!(
                        "field '{}' should be {:?}, got {}",
                        name,
                        property.schema_type,
                        json_kind(field)
                    )));
                }
            }
        }

        serde_json::from_value(Value::Object(object))
            .map_err(|e| ErrorKind::MalformedResponse(format!("failed to decode: {}", e)))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A validated, AI-generated trail suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailSuggestion {
    pub trail_name: String,
    pub difficulty: String,
    pub distance: String,
    pub description: String,
    pub why_it_matches: String,
}

impl TrailSuggestion {
    /// Decodes model output through the trail suggestion contract.
    pub fn from_model_text(text: &str) -> Result<Self, ErrorKind> {
        SchemaDescriptor::trail_suggestion().decode(text)
    }
}

/// Body the site posts to the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSuggestionRequest {
    pub prompt: String,
    pub schema: SchemaDescriptor,
}

impl TrailSuggestionRequest {
    /// Pairs a prompt with the trail suggestion contract.
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            schema: SchemaDescriptor::trail_suggestion(),
        }
    }
}
