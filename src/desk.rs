use crate::analysis::{self, AnalysisService, DocumentContent, ExtractedFields, FieldChange};
use crate::classifier::Classifier;
use crate::collection::DocumentCollection;
use crate::errors::{AppError, AppResult};
use crate::facets::{self, CollectionView, FilterEvent, FilterState};
use crate::models::{AnalysisField, AppSettings, Document, EditDocumentRequest};
use crate::settings::validate_settings;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use tokio::sync::Mutex;
use tokio::time::Duration;

/// Top-level application state: owns the document collection, the list
/// filter and the analysis schema.
#[derive(Clone)]
pub struct DocumentDesk {
    settings: Arc<AppSettings>,
    classifier: Arc<Classifier>,
    collection: Arc<RwLock<DocumentCollection>>,
    filter: Arc<RwLock<FilterState>>,
    analysis_fields: Arc<RwLock<Vec<AnalysisField>>>,
    analysis: Option<Arc<dyn AnalysisService>>,
    rng: Arc<StdMutex<StdRng>>,
    batch_lock: Arc<Mutex<()>>,
}

impl DocumentDesk {
    pub fn new(settings: AppSettings) -> AppResult<Self> {
        validate_settings(&settings)?;
        let classifier = Classifier::new(&settings)?;
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            analysis_fields: Arc::new(RwLock::new(settings.analysis_fields.clone())),
            settings: Arc::new(settings),
            classifier: Arc::new(classifier),
            collection: Arc::new(RwLock::new(DocumentCollection::new())),
            filter: Arc::new(RwLock::new(FilterState::default())),
            analysis: None,
            rng: Arc::new(StdMutex::new(rng)),
            batch_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn with_analysis_service(mut self, service: Arc<dyn AnalysisService>) -> Self {
        self.analysis = Some(service);
        self
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn categories(&self) -> Vec<String> {
        self.classifier.categories()
    }

    /// Classifies a batch of uploads and appends it to the collection.
    ///
    /// Batches run one at a time behind the simulated processing delay; a
    /// batch submitted meanwhile waits for the running one to land.
    pub async fn upload_documents(&self, names: Vec<String>) -> AppResult<Vec<Document>> {
        self.upload_documents_on(names, chrono::Local::now().date_naive())
            .await
    }

    pub async fn upload_documents_on(&self, names: Vec<String>, today: NaiveDate) -> AppResult<Vec<Document>> {
        if let Some(blank) = names.iter().position(|name| name.trim().is_empty()) {
            return Err(AppError::BadRequest(format!("file name at position {} is blank", blank)));
        }
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let _batch = self.batch_lock.lock().await;
        tokio::time::sleep(Duration::from_millis(self.settings.processing_delay_ms)).await;

        let documents = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::Internal("random source lock poisoned".to_string()))?;
            names
                .iter()
                .map(|name| self.classifier.new_document(name.trim(), &mut *rng, today))
                .collect::<Vec<_>>()
        };

        let vocabulary = {
            let mut collection = self.write_collection()?;
            let next = collection.with_appended(documents.iter().cloned());
            *collection = next;
            collection.tag_vocabulary()
        };
        self.reconcile_filter(&vocabulary)?;

        tracing::info!(count = documents.len(), "classified upload batch");
        Ok(documents)
    }

    pub fn list_documents(&self) -> AppResult<Arc<Vec<Document>>> {
        Ok(self.read_collection()?.snapshot())
    }

    pub fn get_document(&self, id: &str) -> AppResult<Document> {
        self.read_collection()?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No document with id {}", id)))
    }

    pub fn edit_document(&self, request: EditDocumentRequest) -> AppResult<Document> {
        let (edited, vocabulary) = {
            let mut collection = self.write_collection()?;
            let (next, edited) = collection.with_edit(&request, &self.settings.taxonomy)?;
            *collection = next;
            (edited, collection.tag_vocabulary())
        };
        self.reconcile_filter(&vocabulary)?;

        tracing::info!(document_id = %edited.id, category = %edited.category, tags = edited.tags.len(), "edited document");
        Ok(edited)
    }

    pub fn filter_state(&self) -> AppResult<FilterState> {
        self.filter
            .read()
            .map(|state| state.clone())
            .map_err(|_| AppError::Internal("filter lock poisoned".to_string()))
    }

    /// Applies a filter event and returns the resulting view.
    ///
    /// The collection snapshot is read while the filter write lock is held.
    pub fn apply_filter_event(&self, event: FilterEvent) -> AppResult<CollectionView> {
        let mut filter = self.write_filter()?;
        let snapshot = self.list_documents()?;
        let vocabulary = facets::tag_options(&snapshot);
        let next = filter.clone().apply(event, &vocabulary);
        *filter = next.clone();
        drop(filter);
        Ok(facets::select_view(&snapshot, &next))
    }

    pub fn current_view(&self) -> AppResult<CollectionView> {
        let snapshot = self.list_documents()?;
        let filter = self.filter_state()?;
        Ok(facets::select_view(&snapshot, &filter))
    }

    pub fn tag_suggestions(&self, search: &str) -> AppResult<Vec<String>> {
        let vocabulary = self.read_collection()?.tag_vocabulary();
        Ok(facets::tag_suggestions(&vocabulary, search))
    }

    pub fn analysis_fields(&self) -> AppResult<Vec<AnalysisField>> {
        self.analysis_fields
            .read()
            .map(|fields| fields.clone())
            .map_err(|_| AppError::Internal("analysis fields lock poisoned".to_string()))
    }

    pub fn update_analysis_fields(&self, change: FieldChange) -> AppResult<Vec<AnalysisField>> {
        let mut fields = self
            .analysis_fields
            .write()
            .map_err(|_| AppError::Internal("analysis fields lock poisoned".to_string()))?;
        let next = analysis::apply_field_change(&fields, change)?;
        *fields = next.clone();
        Ok(next)
    }

    pub async fn analyze_document(&self, content: DocumentContent, num_pages: u32) -> AppResult<ExtractedFields> {
        let Some(service) = self.analysis.clone() else {
            return Err(AppError::Analysis("no analysis service configured".to_string()));
        };
        let fields = self.analysis_fields()?;
        let payload = analysis::build_request(&fields, &content, num_pages)?;

        tracing::info!(fields = fields.len(), content_len = content.as_str().len(), "sending document for analysis");
        let body = service.analyze(payload).await.map_err(|error| {
            tracing::warn!(error = %error, "document analysis failed");
            error
        })?;
        let extracted = analysis::parse_response(&body)?;
        let undefined = extracted
            .values()
            .filter(|value| matches!(value, analysis::FieldValue::Undefined))
            .count();
        tracing::info!(fields = extracted.len(), undefined, "analysis completed");
        Ok(extracted)
    }

    /// Converts extracted fields to delimited text through the analysis
    /// service.
    pub async fn export_delimited(&self, fields: &ExtractedFields) -> AppResult<String> {
        let Some(service) = self.analysis.clone() else {
            return Err(AppError::Analysis("no analysis service configured".to_string()));
        };
        if fields.is_empty() {
            return Err(AppError::BadRequest("no extracted fields to export".to_string()));
        }
        let payload = analysis::build_csv_request(fields);

        tracing::info!(fields = fields.len(), "requesting delimited export");
        let body = service.to_delimited_text(payload).await.map_err(|error| {
            tracing::warn!(error = %error, "delimited export failed");
            error
        })?;
        let text = analysis::parse_csv_response(&body)?;
        tracing::info!(bytes = text.len(), "delimited export completed");
        Ok(text)
    }

    fn reconcile_filter(&self, vocabulary: &[String]) -> AppResult<()> {
        let mut filter = self.write_filter()?;
        let next = facets::reconcile(filter.clone(), vocabulary);
        if next != *filter {
            tracing::debug!(active_tag = ?next.active_tag, "filter reconciled after collection change");
            *filter = next;
        }
        Ok(())
    }

    fn read_collection(&self) -> AppResult<std::sync::RwLockReadGuard<'_, DocumentCollection>> {
        self.collection
            .read()
            .map_err(|_| AppError::Internal("collection lock poisoned".to_string()))
    }

    fn write_collection(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, DocumentCollection>> {
        self.collection
            .write()
            .map_err(|_| AppError::Internal("collection lock poisoned".to_string()))
    }

    fn write_filter(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, FilterState>> {
        self.filter
            .write()
            .map_err(|_| AppError::Internal("filter lock poisoned".to_string()))
    }
}
