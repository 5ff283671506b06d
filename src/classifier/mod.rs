pub mod metadata;
pub mod taxonomy;

use crate::errors::{AppError, AppResult};
use crate::models::{AppSettings, Document, FileKind, SizeRange};
use chrono::NaiveDate;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub tags: Vec<String>,
    pub size: String,
    pub date: String,
}

#[derive(Debug, Clone)]
struct CategoryEntry {
    name: String,
    relevant_tags: Vec<String>,
}

/// Mock document classifier.
///
/// The category is drawn uniformly from the configured list, the relevant
/// tags for that category are always assigned, and up to `max_extra_tags`
/// further tags are drawn without replacement from the rest of the
/// vocabulary. The random source is supplied by the caller.
#[derive(Debug, Clone)]
pub struct Classifier {
    categories: Vec<CategoryEntry>,
    vocabulary: Vec<String>,
    max_extra_tags: usize,
    size_range: SizeRange,
    mb_threshold_kb: u64,
    date_window_days: u32,
}

impl Classifier {
    pub fn new(settings: &AppSettings) -> AppResult<Self> {
        let taxonomy = &settings.taxonomy;
        let categories = taxonomy
            .category_names()
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| CategoryEntry {
                relevant_tags: taxonomy.relevant_tags(&name),
                name,
            })
            .collect::<Vec<_>>();
        if categories.is_empty() {
            return Err(AppError::Config("classifier needs at least one category".to_string()));
        }

        let range = settings.size_range_kb;
        if range.min_kb > range.max_kb {
            return Err(AppError::Config("size range is inverted".to_string()));
        }

        Ok(Self {
            categories,
            vocabulary: taxonomy.vocabulary(),
            max_extra_tags: settings.max_extra_tags,
            size_range: range,
            mb_threshold_kb: settings.mb_threshold_kb,
            date_window_days: settings.date_window_days,
        })
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn classify<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> Classification {
        let entry = &self.categories[rng.random_range(0..self.categories.len())];
        let tags = self.assign_tags(entry, rng);
        let size_kb = rng.random_range(self.size_range.min_kb..=self.size_range.max_kb);
        let days_back = rng.random_range(0..=self.date_window_days);

        Classification {
            category: entry.name.clone(),
            tags,
            size: metadata::format_size(size_kb, self.mb_threshold_kb),
            date: metadata::format_upload_date(metadata::days_before(today, days_back)),
        }
    }

    pub fn new_document<R: Rng + ?Sized>(&self, name: &str, rng: &mut R, today: NaiveDate) -> Document {
        let classification = self.classify(rng, today);
        Document {
            id: uuid::Uuid::now_v7().to_string(),
            name: name.to_string(),
            category: classification.category,
            size: classification.size,
            date: classification.date,
            tags: classification.tags,
            kind: FileKind::from_name(name),
        }
    }

    fn assign_tags<R: Rng + ?Sized>(&self, entry: &CategoryEntry, rng: &mut R) -> Vec<String> {
        let mut tags = entry.relevant_tags.clone();
        let pool = self
            .vocabulary
            .iter()
            .filter(|tag| !tags.contains(tag))
            .collect::<Vec<_>>();

        let extra = rng.random_range(0..=self.max_extra_tags).min(pool.len());
        for index in rand::seq::index::sample(rng, pool.len(), extra) {
            tags.push(pool[index].clone());
        }
        tags
    }
}
