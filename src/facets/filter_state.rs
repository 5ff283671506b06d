use super::view::exact_tag_matches;
use serde::{Deserialize, Serialize};

/// Active selections of the document list.
///
/// Values are replaced, never mutated in place: every event produces a new
/// state, which is then passed through [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub active_category: Option<String>,
    pub active_tag: Option<String>,
    pub tag_search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterEvent {
    /// Category dropdown; `None` or an empty string means "all categories".
    SelectCategory(Option<String>),
    /// Tag dropdown; a non-empty selection clears the search text.
    SelectTag(Option<String>),
    SearchChanged(String),
    ClearSearch,
    /// A tag chip on a document card.
    ClickTag(String),
    ClearCategory,
    ClearTag,
    Reset,
}

impl FilterState {
    pub fn with_category(category: &str) -> Self {
        Self {
            active_category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn with_search(search: &str) -> Self {
        Self {
            tag_search: search.to_string(),
            ..Self::default()
        }
    }

    /// Applies `event` and reconciles the result against `vocabulary`.
    pub fn apply(self, event: FilterEvent, vocabulary: &[String]) -> Self {
        let next = match event {
            FilterEvent::SelectCategory(category) => Self {
                active_category: non_empty(category),
                ..self
            },
            FilterEvent::SelectTag(tag) => match non_empty(tag) {
                Some(tag) => Self {
                    active_tag: Some(tag),
                    tag_search: String::new(),
                    ..self
                },
                None => Self {
                    active_tag: None,
                    ..self
                },
            },
            FilterEvent::SearchChanged(search) => {
                // Erasing the search also drops the tag it promoted.
                let active_tag = if !search.is_empty() || self.search_owns_active_tag(vocabulary) {
                    None
                } else {
                    self.active_tag.clone()
                };
                Self {
                    active_tag,
                    tag_search: search,
                    ..self
                }
            }
            FilterEvent::ClearSearch => {
                let active_tag = if self.search_owns_active_tag(vocabulary) {
                    None
                } else {
                    self.active_tag.clone()
                };
                Self {
                    active_tag,
                    tag_search: String::new(),
                    ..self
                }
            }
            FilterEvent::ClickTag(tag) => Self {
                active_tag: non_empty(Some(tag)),
                tag_search: String::new(),
                ..self
            },
            FilterEvent::ClearCategory => Self {
                active_category: None,
                ..self
            },
            FilterEvent::ClearTag => Self {
                active_tag: None,
                ..self
            },
            FilterEvent::Reset => Self::default(),
        };
        reconcile(next, vocabulary)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_category.is_none() && self.active_tag.is_none() && self.tag_search.trim().is_empty()
    }

    // True when the active tag is the one the current search text resolves to.
    fn search_owns_active_tag(&self, vocabulary: &[String]) -> bool {
        let Some(active) = self.active_tag.as_deref() else {
            return false;
        };
        exact_tag_matches(vocabulary, &self.tag_search)
            .iter()
            .any(|candidate| candidate.as_str() == active)
    }
}

/// Keeps the active tag consistent with the search box and the vocabulary.
///
/// * Non-empty search with exactly one case-insensitive exact match and no
///   active tag: the match becomes the active tag.
/// * Empty search and an active tag missing from the vocabulary: the active
///   tag is cleared.
pub fn reconcile(state: FilterState, vocabulary: &[String]) -> FilterState {
    if state.tag_search.trim().is_empty() {
        let stale = state
            .active_tag
            .as_ref()
            .is_some_and(|tag| !vocabulary.contains(tag));
        if stale {
            return FilterState {
                active_tag: None,
                ..state
            };
        }
        return state;
    }

    if state.active_tag.is_none() {
        if let [only] = exact_tag_matches(vocabulary, &state.tag_search).as_slice() {
            let promoted = (*only).clone();
            return FilterState {
                active_tag: Some(promoted),
                ..state
            };
        }
    }
    state
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
