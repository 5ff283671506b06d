use crate::errors::{AppError, AppResult};
use crate::models::{AnalysisField, ContentEncoding};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

const UNDEFINED_SENTINEL: &str = "undefined";

const EXTRACTION_INSTRUCTION: &str = "Du er en nøyaktig assistent som analyserer et dokument og henter ut korrekt informasjon. Fyll kun ut felter som er definert i dataskjema. Felter og informasjon som ikke kan identifiseres angis som \"undefined\".";

pub fn default_analysis_fields() -> Vec<AnalysisField> {
    vec![
        AnalysisField::new("Name", "Person or company name"),
        AnalysisField::new("Date", "Document date"),
        AnalysisField::new("Amount", "Total amount"),
        AnalysisField::new("InvoiceNumber", "Invoice or document number"),
        AnalysisField::new("DueDate", "Payment due date"),
        AnalysisField::new("DocumentType", "Type of document (invoice, contract, etc.)"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FieldChange {
    Add,
    #[serde(rename_all = "camelCase")]
    Update {
        index: usize,
        name: Option<String>,
        description: Option<String>,
    },
    Remove {
        index: usize,
    },
}

/// Returns the schema with `change` applied; the input is left untouched.
pub fn apply_field_change(fields: &[AnalysisField], change: FieldChange) -> AppResult<Vec<AnalysisField>> {
    let mut next = fields.to_vec();
    match change {
        FieldChange::Add => next.push(AnalysisField::new("", "")),
        FieldChange::Update {
            index,
            name,
            description,
        } => {
            let len = next.len();
            let field = next
                .get_mut(index)
                .ok_or_else(|| AppError::BadRequest(format!("field index {} out of range ({})", index, len)))?;
            if let Some(name) = name {
                field.name = name;
            }
            if let Some(description) = description {
                field.description = description;
            }
        }
        FieldChange::Remove { index } => {
            if index >= next.len() {
                return Err(AppError::BadRequest(format!(
                    "field index {} out of range ({})",
                    index,
                    next.len()
                )));
            }
            next.remove(index);
        }
    }
    Ok(next)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    Text(String),
    DataUrl(String),
}

impl DocumentContent {
    /// Binary formats travel as base64 data URLs, everything else as text.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        let binary = mime.contains("pdf") || mime.contains("image") || mime.contains("application/octet-stream");
        if binary {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            Self::DataUrl(format!("data:{};base64,{}", mime, encoded))
        } else {
            Self::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    pub fn decode(content: &str, encoding: ContentEncoding, mime_type: Option<&str>) -> AppResult<Self> {
        let mime = mime_type.unwrap_or("text/plain");
        match encoding {
            ContentEncoding::Text => Ok(Self::from_bytes(mime, content.as_bytes())),
            ContentEncoding::Base64 => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(content.trim())
                    .map_err(|err| AppError::BadRequest(format!("invalid base64 content: {}", err)))?;
                Ok(Self::from_bytes(mime, &bytes))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::DataUrl(url) => url,
        }
    }
}

/// Builds the request body for the remote extraction endpoint.
pub fn build_request(fields: &[AnalysisField], content: &DocumentContent, num_pages: u32) -> AppResult<Value> {
    let schema = fields
        .iter()
        .filter(|field| !field.name.trim().is_empty())
        .map(|field| json!([field.name.trim().to_lowercase(), field.description]))
        .collect::<Vec<_>>();
    if schema.is_empty() {
        return Err(AppError::BadRequest("at least one named analysis field is required".to_string()));
    }

    Ok(json!({
        "data": [
            EXTRACTION_INSTRUCTION,
            {
                "headers": ["Navn", "Beskrivelse"],
                "data": schema,
                "metadata": null,
            },
            {
                "headers": ["Begrep", "Definisjon"],
                "data": [["", ""]],
                "metadata": null,
            },
            content.as_str(),
            num_pages.to_string(),
        ]
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Extracted(String),
    Undefined,
}

pub type ExtractedFields = BTreeMap<String, FieldValue>;

/// Reads the extraction result out of a response body.
///
/// The fields live under `data` when present, otherwise at the top level; a
/// list result contributes its first object. `"undefined"`, empty strings and
/// nulls all become [`FieldValue::Undefined`].
pub fn parse_response(body: &Value) -> AppResult<ExtractedFields> {
    let mut result = body.get("data").unwrap_or(body);
    while let Value::Array(items) = result {
        result = items
            .first()
            .ok_or_else(|| AppError::Analysis("empty result list".to_string()))?;
    }
    if let Value::String(raw) = result {
        let parsed: Value = serde_json::from_str(raw)
            .map_err(|err| AppError::Analysis(format!("result is not a JSON object: {}", err)))?;
        return parse_response(&parsed);
    }
    let Value::Object(map) = result else {
        return Err(AppError::Analysis(format!("unexpected result shape: {}", result)));
    };
    Ok(fields_from_object(map))
}

pub fn fields_from_object(map: &serde_json::Map<String, Value>) -> ExtractedFields {
    map.iter()
        .map(|(key, value)| (key.clone(), field_value(value)))
        .collect()
}

/// Extracted fields as the plain object the conversion endpoint expects,
/// with the `"undefined"` sentinel restored for missing values.
pub fn fields_to_json(fields: &ExtractedFields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    FieldValue::Extracted(text) => Value::String(text.clone()),
                    FieldValue::Undefined => Value::String(UNDEFINED_SENTINEL.to_string()),
                };
                (key.clone(), value)
            })
            .collect(),
    )
}

/// Request body for the delimited-text conversion endpoint.
pub fn build_csv_request(fields: &ExtractedFields) -> Value {
    json!({ "data": [fields_to_json(fields)] })
}

/// Reads delimited text from a conversion response: the `data` member when
/// present, otherwise the whole body. Non-string results come back as JSON
/// text.
pub fn parse_csv_response(body: &Value) -> AppResult<String> {
    let result = body.get("data").unwrap_or(body);
    match result {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string(other).map_err(|err| AppError::Analysis(err.to_string())),
    }
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Undefined,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNDEFINED_SENTINEL) {
                FieldValue::Undefined
            } else {
                FieldValue::Extracted(trimmed.to_string())
            }
        }
        other => FieldValue::Extracted(other.to_string()),
    }
}

pub type AnalysisFuture = Pin<Box<dyn Future<Output = AppResult<Value>> + Send>>;

/// Remote analysis endpoints. Implementations post `payload` and resolve to
/// the raw response body.
pub trait AnalysisService: Send + Sync {
    /// Field extraction; `payload` comes from [`build_request`].
    fn analyze(&self, payload: Value) -> AnalysisFuture;

    /// Delimited-text conversion; `payload` comes from [`build_csv_request`].
    fn to_delimited_text(&self, payload: Value) -> AnalysisFuture;
}
