use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Image,
    Document,
    Spreadsheet,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" => Self::Image,
            "pdf" | "doc" | "docx" | "txt" | "rtf" => Self::Document,
            "xls" | "xlsx" | "csv" => Self::Spreadsheet,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::Other => "other",
        }
    }
}

/// One uploaded file and the metadata the desk assigned to it.
///
/// `id`, `size`, `date` and `kind` are fixed at upload time. Only the edit
/// operation may change `name`, `category` and `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub category: String,
    pub size: String,
    pub date: String,
    pub tags: Vec<String>,
    pub kind: FileKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub name: String,
    #[serde(default)]
    pub relevant_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub categories: Vec<CategoryDefinition>,
    /// Vocabulary entries that belong to no category's relevant list.
    #[serde(default)]
    pub extra_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    pub min_kb: u64,
    pub max_kb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisField {
    pub name: String,
    pub description: String,
}

impl AnalysisField {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub taxonomy: Taxonomy,
    pub max_extra_tags: usize,
    pub size_range_kb: SizeRange,
    pub mb_threshold_kb: u64,
    pub date_window_days: u32,
    pub processing_delay_ms: u64,
    pub rng_seed: Option<u64>,
    pub analysis_fields: Vec<AnalysisField>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            taxonomy: crate::classifier::taxonomy::default_taxonomy(),
            max_extra_tags: 2,
            size_range_kb: SizeRange {
                min_kb: 10,
                max_kb: 5000,
            },
            mb_threshold_kb: 1024,
            date_window_days: 30,
            processing_delay_ms: 1500,
            rng_seed: None,
            analysis_fields: crate::analysis::default_analysis_fields(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentsPayload {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDocumentRequest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSuggestionsRequest {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContentEncoding {
    #[default]
    Text,
    Base64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeDocumentPayload {
    pub content: String,
    #[serde(default)]
    pub encoding: ContentEncoding,
    pub mime_type: Option<String>,
    pub num_pages: Option<u32>,
}

/// Extracted values keyed by field name, as plain strings; `"undefined"`,
/// blanks and nulls mark missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDelimitedPayload {
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, FileKind};

    #[test]
    fn file_kind_follows_extension() {
        assert_eq!(FileKind::from_name("scan.JPG"), FileKind::Image);
        assert_eq!(FileKind::from_name("faktura.pdf"), FileKind::Document);
        assert_eq!(FileKind::from_name("budsjett.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("arkiv.zip"), FileKind::Other);
        assert_eq!(FileKind::from_name("README"), FileKind::Other);
    }

    #[test]
    fn partial_settings_fill_from_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"processingDelayMs": 0, "rngSeed": 7}"#).expect("parse settings");
        assert_eq!(settings.processing_delay_ms, 0);
        assert_eq!(settings.rng_seed, Some(7));
        assert_eq!(settings.max_extra_tags, 2);
        assert!(!settings.taxonomy.categories.is_empty());
    }
}
