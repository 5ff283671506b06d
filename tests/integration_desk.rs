use document_desk_lib::classifier::Classifier;
use document_desk_lib::facets::{select_view, FilterEvent, FilterState};
use document_desk_lib::models::{AppSettings, CategoryDefinition, Document, EditDocumentRequest, FileKind, Taxonomy};
use document_desk_lib::DocumentDesk;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

fn quick_settings(seed: u64) -> AppSettings {
    AppSettings {
        processing_delay_ms: 0,
        rng_seed: Some(seed),
        ..AppSettings::default()
    }
}

fn doc(id: &str, category: &str, tags: &[&str]) -> Document {
    Document {
        id: id.to_string(),
        name: format!("{}.pdf", id),
        category: category.to_string(),
        size: "1 KB".to_string(),
        date: "18.10.2026".to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        kind: FileKind::Document,
    }
}

#[test]
fn pass_classification_scenario() {
    let mut settings = AppSettings::default();
    let defaults = settings.taxonomy.clone();
    settings.taxonomy = Taxonomy {
        categories: vec![CategoryDefinition {
            name: "Pass".to_string(),
            relevant_tags: defaults.relevant_tags("Pass"),
        }],
        extra_tags: defaults.vocabulary(),
    };
    let classifier = Classifier::new(&settings).expect("classifier");
    let size_pattern = regex::Regex::new(r"^(\d+ KB|\d+\.\d MB)$").expect("valid regex");

    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..50 {
        let result = classifier.classify(&mut rng, today());
        assert_eq!(result.category, "Pass");
        assert_eq!(&result.tags[..3], &["identifikasjon", "statsborgerskap", "navn"]);
        assert!(result.tags.len() <= 5);
        assert!(size_pattern.is_match(&result.size));
    }
}

#[test]
fn category_filter_scenario() {
    let documents = vec![doc("a", "A", &["x"]), doc("b", "B", &["y"])];
    let view = select_view(&documents, &FilterState::with_category("A"));
    assert_eq!(view.visible.len(), 1);
    assert_eq!(view.visible[0].category, "A");
    assert_eq!(view.category_options, vec!["A", "B"]);
}

#[tokio::test]
async fn search_promotion_round_trip_through_desk() {
    let desk = DocumentDesk::new(quick_settings(21)).expect("desk");
    let uploaded = desk
        .upload_documents_on(vec!["pass.jpg".to_string()], today())
        .await
        .expect("upload");
    let target = uploaded[0].tags[0].clone();

    let view = desk
        .apply_filter_event(FilterEvent::SearchChanged(target.to_uppercase()))
        .expect("search");
    assert_eq!(view.filter.active_tag.as_deref(), Some(target.as_str()));
    assert_eq!(view.visible.len(), 1);

    let view = desk.apply_filter_event(FilterEvent::ClearSearch).expect("clear search");
    assert_eq!(view.filter.active_tag, None);
    assert!(view.filter.is_unfiltered());
}

#[tokio::test]
async fn empty_name_edit_keeps_prior_name() {
    let desk = DocumentDesk::new(quick_settings(4)).expect("desk");
    let uploaded = desk
        .upload_documents_on(vec!["arbeidsavtale.pdf".to_string()], today())
        .await
        .expect("upload");
    let original = uploaded[0].clone();

    let edited = desk
        .edit_document(EditDocumentRequest {
            id: original.id.clone(),
            name: String::new(),
            category: "Kontrakt".to_string(),
            tags: vec!["avtale".to_string(), "avtale".to_string()],
        })
        .expect("edit");
    assert_eq!(edited.name, "arbeidsavtale.pdf");
    assert_eq!(edited.category, "Kontrakt");
    assert_eq!(edited.tags, vec!["avtale"]);
    assert_eq!(edited.size, original.size);
    assert_eq!(edited.date, original.date);
    assert_eq!(edited.kind, FileKind::Document);
}
