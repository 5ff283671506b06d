use chrono::{Duration, NaiveDate};

const KB_PER_MB: f64 = 1024.0;

/// Whole kilobytes below `mb_threshold_kb`, megabytes with one decimal from it.
pub fn format_size(size_kb: u64, mb_threshold_kb: u64) -> String {
    if size_kb < mb_threshold_kb {
        format!("{} KB", size_kb)
    } else {
        format!("{:.1} MB", size_kb as f64 / KB_PER_MB)
    }
}

/// Norwegian short date, e.g. `18.10.2026`.
pub fn format_upload_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn days_before(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days))
}

#[cfg(test)]
mod tests {
    use super::{days_before, format_size, format_upload_date};
    use chrono::NaiveDate;

    #[test]
    fn sizes_switch_units_at_threshold() {
        assert_eq!(format_size(10, 1024), "10 KB");
        assert_eq!(format_size(1023, 1024), "1023 KB");
        assert_eq!(format_size(1024, 1024), "1.0 MB");
        assert_eq!(format_size(5000, 1024), "4.9 MB");
    }

    #[test]
    fn dates_use_day_month_year() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        assert_eq!(format_upload_date(today), "02.03.2026");
        assert_eq!(format_upload_date(days_before(today, 2)), "28.02.2026");
    }
}
