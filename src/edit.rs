use crate::errors::{AppError, AppResult};
use crate::models::{Document, EditDocumentRequest, Taxonomy};

/// Applies an edit to `document`, returning the replacement.
///
/// Blank names and categories keep the previous value, as does a category
/// outside the taxonomy. Tags are replaced wholesale after trimming and
/// de-duplication. Identity, size, date and kind never change.
pub fn apply_edit(document: &Document, request: &EditDocumentRequest, taxonomy: &Taxonomy) -> Document {
    let name = request.name.trim();
    let name = if name.is_empty() {
        document.name.clone()
    } else {
        name.to_string()
    };

    let proposed = request.category.trim();
    let category = if proposed.is_empty() {
        document.category.clone()
    } else if !taxonomy.contains_category(proposed) {
        tracing::warn!(
            document_id = %document.id,
            category = %proposed,
            "unknown category on edit; keeping previous"
        );
        document.category.clone()
    } else {
        proposed.to_string()
    };

    Document {
        name,
        category,
        tags: normalize_tags(&request.tags),
        ..document.clone()
    }
}

pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|existing| existing == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Working copy behind the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    pub name: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl EditDraft {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            category: document.category.clone(),
            tags: document.tags.clone(),
        }
    }

    /// Adds a trimmed tag; blank or already present tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    pub fn into_request(self) -> EditDocumentRequest {
        EditDocumentRequest {
            id: self.id,
            name: self.name,
            category: self.category,
            tags: self.tags,
        }
    }
}

pub fn find_document<'a>(documents: &'a [Document], id: &str) -> AppResult<&'a Document> {
    documents
        .iter()
        .find(|document| document.id == id)
        .ok_or_else(|| AppError::NotFound(format!("No document with id {}", id)))
}

#[cfg(test)]
mod tests {
    use super::{apply_edit, normalize_tags, EditDraft};
    use crate::classifier::taxonomy::default_taxonomy;
    use crate::models::{Document, EditDocumentRequest, FileKind};

    fn receipt() -> Document {
        Document {
            id: "0192f3c1-0000-7000-8000-000000000001".to_string(),
            name: "kvittering.jpg".to_string(),
            category: "Kvittering".to_string(),
            size: "245 KB".to_string(),
            date: "12.10.2026".to_string(),
            tags: vec!["kjøp".to_string(), "beløp".to_string(), "dato".to_string()],
            kind: FileKind::Image,
        }
    }

    #[test]
    fn empty_name_keeps_previous() {
        let request = EditDocumentRequest {
            id: receipt().id,
            name: String::new(),
            category: "Faktura".to_string(),
            tags: vec!["betaling".to_string()],
        };
        let edited = apply_edit(&receipt(), &request, &default_taxonomy());
        assert_eq!(edited.name, "kvittering.jpg");
        assert_eq!(edited.category, "Faktura");
        assert_eq!(edited.tags, vec!["betaling"]);
    }

    #[test]
    fn blank_or_unknown_category_keeps_previous() {
        let taxonomy = default_taxonomy();
        let mut request = EditDocumentRequest {
            id: receipt().id,
            name: "hotell.jpg".to_string(),
            category: "   ".to_string(),
            tags: Vec::new(),
        };
        assert_eq!(apply_edit(&receipt(), &request, &taxonomy).category, "Kvittering");

        request.category = "Oppskrift".to_string();
        let edited = apply_edit(&receipt(), &request, &taxonomy);
        assert_eq!(edited.category, "Kvittering");
        assert_eq!(edited.name, "hotell.jpg");
        assert!(edited.tags.is_empty());
    }

    #[test]
    fn immutable_fields_survive_edit() {
        let original = receipt();
        let request = EditDocumentRequest {
            id: original.id.clone(),
            name: "ny.jpg".to_string(),
            category: "Pass".to_string(),
            tags: vec!["navn".to_string()],
        };
        let edited = apply_edit(&original, &request, &default_taxonomy());
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.size, original.size);
        assert_eq!(edited.date, original.date);
        assert_eq!(edited.kind, original.kind);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![" navn ".to_string(), "navn".to_string(), "".to_string(), "adresse".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["navn", "adresse"]);
    }

    #[test]
    fn draft_add_and_remove() {
        let mut draft = EditDraft::from_document(&receipt());
        assert!(draft.add_tag("  viktig "));
        assert!(!draft.add_tag("viktig"));
        assert!(!draft.add_tag("   "));
        assert!(draft.remove_tag("dato"));
        assert!(!draft.remove_tag("dato"));
        let request = draft.into_request();
        assert_eq!(request.tags, vec!["kjøp", "beløp", "viktig"]);
    }
}
