use crate::edit::{apply_edit, find_document};
use crate::errors::AppResult;
use crate::facets::tag_options;
use crate::models::{Document, EditDocumentRequest, Taxonomy};
use std::sync::Arc;

/// Append-only document list with copy-on-write updates.
///
/// Every mutation builds a new backing vector; snapshots handed out earlier
/// keep seeing the old one.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Arc<Vec<Document>>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(documents),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Document>> {
        Arc::clone(&self.documents)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    pub fn tag_vocabulary(&self) -> Vec<String> {
        tag_options(&self.documents)
    }

    pub fn with_appended(&self, incoming: impl IntoIterator<Item = Document>) -> Self {
        let mut next = Vec::clone(&self.documents);
        next.extend(incoming);
        Self::from_documents(next)
    }

    /// Returns the updated collection and the edited document.
    pub fn with_edit(&self, request: &EditDocumentRequest, taxonomy: &Taxonomy) -> AppResult<(Self, Document)> {
        let current = find_document(&self.documents, &request.id)?;
        let edited = apply_edit(current, request, taxonomy);
        let next = self
            .documents
            .iter()
            .map(|document| {
                if document.id == edited.id {
                    edited.clone()
                } else {
                    document.clone()
                }
            })
            .collect::<Vec<_>>();
        Ok((Self::from_documents(next), edited))
    }
}
