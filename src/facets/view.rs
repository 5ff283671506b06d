use super::filter_state::FilterState;
use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub count: usize,
    pub documents: Vec<Document>,
}

/// Everything the document list renders for one filter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView {
    pub filter: FilterState,
    pub visible: Vec<Document>,
    pub groups: Vec<CategoryGroup>,
    pub category_options: Vec<String>,
    pub tag_options: Vec<String>,
    /// Tag matched by the search text when no tag is explicitly active.
    pub implicit_tag: Option<String>,
    pub total_documents: usize,
    pub no_matches: bool,
}

pub fn select_view(documents: &[Document], filter: &FilterState) -> CollectionView {
    let tag_options = tag_options(documents);
    let implicit_tag = match filter.active_tag {
        Some(_) => None,
        None => exact_tag_match(&tag_options, &filter.tag_search).cloned(),
    };
    let visible = filter_documents(documents, filter)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let groups = group_by_category(&visible);

    tracing::debug!(
        total = documents.len(),
        visible = visible.len(),
        category = ?filter.active_category,
        tag = ?filter.active_tag,
        "evaluated document filter"
    );

    CollectionView {
        filter: filter.clone(),
        no_matches: visible.is_empty(),
        visible,
        groups,
        category_options: category_options(documents),
        tag_options,
        implicit_tag,
        total_documents: documents.len(),
    }
}

/// Documents passing the category, tag and implicit search filters, in
/// collection order.
pub fn filter_documents<'a>(documents: &'a [Document], filter: &FilterState) -> Vec<&'a Document> {
    let implicit = match filter.active_tag {
        Some(_) => None,
        None => {
            let vocabulary = tag_options(documents);
            exact_tag_match(&vocabulary, &filter.tag_search).map(|tag| tag.to_lowercase())
        }
    };

    documents
        .iter()
        .filter(|document| {
            filter
                .active_category
                .as_ref()
                .map_or(true, |category| &document.category == category)
        })
        .filter(|document| {
            filter
                .active_tag
                .as_ref()
                .map_or(true, |tag| document.tags.contains(tag))
        })
        .filter(|document| {
            implicit.as_ref().map_or(true, |needle| {
                document.tags.iter().any(|tag| tag.to_lowercase() == *needle)
            })
        })
        .collect()
}

pub fn group_by_category(documents: &[Document]) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<&str, Vec<Document>> = BTreeMap::new();
    for document in documents {
        groups
            .entry(document.category.as_str())
            .or_default()
            .push(document.clone());
    }
    groups
        .into_iter()
        .map(|(category, documents)| CategoryGroup {
            category: category.to_string(),
            count: documents.len(),
            documents,
        })
        .collect()
}

pub fn category_options(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|document| document.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn tag_options(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .flat_map(|document| document.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tags equal to the trimmed search text, ignoring case.
pub fn exact_tag_matches<'a>(vocabulary: &'a [String], search: &str) -> Vec<&'a String> {
    let query = search.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    vocabulary
        .iter()
        .filter(|tag| tag.to_lowercase() == query)
        .collect()
}

pub fn exact_tag_match<'a>(vocabulary: &'a [String], search: &str) -> Option<&'a String> {
    exact_tag_matches(vocabulary, search).into_iter().next()
}

/// Tag options narrowed by the search box; all tags while it is blank.
pub fn tag_suggestions(vocabulary: &[String], search: &str) -> Vec<String> {
    if search.trim().is_empty() {
        return vocabulary.to_vec();
    }
    let query = search.to_lowercase();
    vocabulary
        .iter()
        .filter(|tag| tag.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{category_options, filter_documents, select_view, tag_options, tag_suggestions};
    use crate::facets::{FilterEvent, FilterState};
    use crate::models::{Document, FileKind};

    fn doc(id: &str, category: &str, tags: &[&str]) -> Document {
        Document {
            id: id.to_string(),
            name: format!("{}.pdf", id),
            category: category.to_string(),
            size: "12 KB".to_string(),
            date: "18.10.2026".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            kind: FileKind::Document,
        }
    }

    fn sample() -> Vec<Document> {
        vec![
            doc("1", "Kvittering", &["kjøp", "beløp"]),
            doc("2", "Faktura", &["betaling", "beløp"]),
            doc("3", "Kvittering", &["kjøp", "Arkiv"]),
            doc("4", "Pass", &["navn"]),
        ]
    }

    #[test]
    fn category_filter_keeps_unfiltered_options() {
        let documents = vec![doc("a", "A", &["x"]), doc("b", "B", &["y"])];
        let view = select_view(&documents, &FilterState::with_category("A"));
        assert_eq!(view.visible, vec![documents[0].clone()]);
        assert_eq!(view.category_options, vec!["A", "B"]);
        assert_eq!(view.tag_options, vec!["x", "y"]);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let documents = sample();
        let visible = filter_documents(&documents, &FilterState::with_category("kvittering"));
        assert!(visible.is_empty());
    }

    #[test]
    fn groups_are_sorted_and_keep_collection_order() {
        let view = select_view(&sample(), &FilterState::default());
        let names = view.groups.iter().map(|group| group.category.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Faktura", "Kvittering", "Pass"]);
        let receipts = &view.groups[1];
        assert_eq!(receipts.count, 2);
        assert_eq!(receipts.documents[0].id, "1");
        assert_eq!(receipts.documents[1].id, "3");
    }

    #[test]
    fn explicit_tag_and_category_combine() {
        let filter = FilterState {
            active_category: Some("Kvittering".to_string()),
            active_tag: Some("beløp".to_string()),
            ..FilterState::default()
        };
        let ids = filter_documents(&sample(), &filter)
            .into_iter()
            .map(|document| document.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn exact_search_filters_without_active_tag() {
        let documents = sample();
        let view = select_view(&documents, &FilterState::with_search(" arkiv "));
        assert_eq!(view.implicit_tag.as_deref(), Some("Arkiv"));
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].id, "3");

        let partial = select_view(&documents, &FilterState::with_search("ark"));
        assert_eq!(partial.implicit_tag, None);
        assert_eq!(partial.visible.len(), documents.len());
    }

    #[test]
    fn filtering_is_idempotent_and_options_never_shrink() {
        let documents = sample();
        let filter = FilterState {
            active_category: Some("Kvittering".to_string()),
            ..FilterState::default()
        };
        let once = filter_documents(&documents, &filter)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let twice = filter_documents(&once, &filter)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(once, twice);

        let view = select_view(&documents, &filter);
        assert_eq!(view.category_options, category_options(&documents));
        assert_eq!(view.tag_options, tag_options(&documents));
    }

    #[test]
    fn no_matches_and_empty_collection_are_explicit() {
        let view = select_view(&sample(), &FilterState::with_category("Kontrakt"));
        assert!(view.no_matches);
        assert!(view.groups.is_empty());
        assert_eq!(view.total_documents, 4);

        let empty = select_view(&[], &FilterState::default());
        assert!(empty.no_matches);
        assert_eq!(empty.total_documents, 0);
        assert!(empty.category_options.is_empty());
    }

    #[test]
    fn promoted_tag_drives_the_view() {
        let documents = sample();
        let vocabulary = tag_options(&documents);
        let filter = FilterState::default().apply(FilterEvent::SearchChanged("navn".to_string()), &vocabulary);
        let view = select_view(&documents, &filter);
        assert_eq!(view.filter.active_tag.as_deref(), Some("navn"));
        assert_eq!(view.implicit_tag, None);
        assert_eq!(view.visible.len(), 1);
    }

    #[test]
    fn suggestions_use_substring_match() {
        let vocabulary = tag_options(&sample());
        assert_eq!(tag_suggestions(&vocabulary, "  "), vocabulary);
        assert_eq!(tag_suggestions(&vocabulary, "BEL"), vec!["beløp"]);
        assert_eq!(tag_suggestions(&vocabulary, "a"), vec!["Arkiv", "betaling", "navn"]);
    }
}
