use crate::models::{CategoryDefinition, Taxonomy};
use once_cell::sync::Lazy;

static DEFAULT_CATEGORIES: &[(&str, [&str; 3])] = &[
    ("Faktura", ["betaling", "beløp", "forfallsdato"]),
    ("Kvittering", ["kjøp", "beløp", "dato"]),
    ("Kontrakt", ["avtale", "signatur", "parter"]),
    ("Pass", ["identifikasjon", "statsborgerskap", "navn"]),
    ("Lønnsslipp", ["lønn", "skatt", "arbeidsgiver"]),
    ("Skattemelding", ["skatt", "inntekt", "fradrag"]),
];

static DEFAULT_EXTRA_TAGS: &[&str] = &["adresse", "viktig", "arkiv", "personlig", "jobb", "bolig"];

static DEFAULT_TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| Taxonomy {
    categories: DEFAULT_CATEGORIES
        .iter()
        .map(|(name, tags)| CategoryDefinition {
            name: name.to_string(),
            relevant_tags: tags.iter().map(|tag| tag.to_string()).collect(),
        })
        .collect(),
    extra_tags: DEFAULT_EXTRA_TAGS.iter().map(|tag| tag.to_string()).collect(),
});

pub fn default_taxonomy() -> Taxonomy {
    DEFAULT_TAXONOMY.clone()
}

impl Taxonomy {
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.trim().to_string())
            .collect()
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category.name.trim() == name)
    }

    /// Relevant tags for `category`, trimmed and de-duplicated in order.
    /// Unknown categories have none.
    pub fn relevant_tags(&self, category: &str) -> Vec<String> {
        let Some(definition) = self
            .categories
            .iter()
            .find(|definition| definition.name.trim() == category)
        else {
            return Vec::new();
        };
        dedupe(definition.relevant_tags.iter())
    }

    /// Every tag the classifier may assign: all relevant tags in category
    /// order, then the extra tags.
    pub fn vocabulary(&self) -> Vec<String> {
        dedupe(
            self.categories
                .iter()
                .flat_map(|category| category.relevant_tags.iter())
                .chain(self.extra_tags.iter()),
        )
    }
}

fn dedupe<'a>(tags: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|existing| existing == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
