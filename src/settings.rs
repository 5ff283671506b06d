use crate::errors::{AppError, AppResult};
use crate::models::AppSettings;
use std::collections::BTreeSet;
use std::path::Path;

pub const CONFIG_ENV: &str = "DOCDESK_CONFIG";

/// Reads settings from a YAML file. A missing file yields the defaults;
/// anything present must parse and validate.
pub fn load_settings(path: Option<&Path>) -> AppResult<AppSettings> {
    let Some(path) = path else {
        return Ok(AppSettings::default());
    };
    if !path.exists() {
        tracing::info!(path = %path.to_string_lossy(), "settings file not found; using defaults");
        return Ok(AppSettings::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let settings = if raw.trim().is_empty() {
        AppSettings::default()
    } else {
        serde_yaml::from_str::<AppSettings>(&raw)?
    };
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn load_settings_from_env() -> AppResult<AppSettings> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_settings(Some(Path::new(&path))),
        None => Ok(AppSettings::default()),
    }
}

pub fn validate_settings(settings: &AppSettings) -> AppResult<()> {
    let categories = &settings.taxonomy.categories;
    if categories.is_empty() {
        return Err(AppError::Config("taxonomy.categories cannot be empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for category in categories {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(AppError::Config("category name cannot be blank".to_string()));
        }
        if !seen.insert(name) {
            return Err(AppError::Config(format!("duplicate category '{}'", name)));
        }
    }

    let range = settings.size_range_kb;
    if range.min_kb == 0 || range.min_kb > range.max_kb {
        return Err(AppError::Config(format!(
            "sizeRangeKb must satisfy 0 < min <= max (got {}..={})",
            range.min_kb, range.max_kb
        )));
    }
    if settings.mb_threshold_kb == 0 {
        return Err(AppError::Config("mbThresholdKb must be positive".to_string()));
    }
    if settings.max_extra_tags > 2 {
        return Err(AppError::Config(format!(
            "maxExtraTags must be at most 2 (got {})",
            settings.max_extra_tags
        )));
    }
    Ok(())
}
