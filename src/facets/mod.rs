mod filter_state;
mod view;

pub use filter_state::{reconcile, FilterEvent, FilterState};
pub use view::{
    category_options, exact_tag_match, exact_tag_matches, filter_documents, group_by_category, select_view,
    tag_options, tag_suggestions, CategoryGroup, CollectionView,
};
