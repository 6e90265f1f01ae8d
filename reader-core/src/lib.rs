//! Logic lõi của trang đọc feed: kiểu dữ liệu, cấu hình và định dạng thời gian.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Cấu hình điều chỉnh nhịp cập nhật và giới hạn feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReaderConfig {
    /// Chu kỳ (giây) cập nhật lại nhãn thời gian tương đối và đồng hồ.
    pub relative_tick_secs: u32,
    /// Chu kỳ (giây) tự động tải lại trang.
    pub auto_refresh_secs: u32,
    /// Số bài tối đa giữ lại cho mỗi feed.
    pub max_entries_per_feed: usize,
    /// Thời gian (giây) giữ feed trong cache.
    pub cache_ttl_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            relative_tick_secs: 60,
            auto_refresh_secs: 300,
            max_entries_per_feed: 5,
            cache_ttl_secs: 300,
        }
    }
}

/// Thời điểm đăng bài, giữ nguyên ba trạng thái của dữ liệu nguồn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EntryDate {
    Known(DateTime<Utc>),
    Missing,
    Invalid,
}

impl EntryDate {
    /// Nhãn hiển thị cho người đọc tại thời điểm `now`.
    pub fn relative_label(&self, now: DateTime<Utc>) -> String {
        match self {
            EntryDate::Known(at) => format_relative_time(*at, now),
            EntryDate::Missing => "No date available".to_string(),
            EntryDate::Invalid => "Invalid date format".to_string(),
        }
    }
}

/// Một bài viết trong feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: EntryDate,
}

impl Default for FeedEntry {
    fn default() -> Self {
        Self {
            title: "No title".to_string(),
            link: "#".to_string(),
            summary: "No summary available".to_string(),
            published: EntryDate::Missing,
        }
    }
}

/// Kết quả đọc một feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedSnapshot {
    pub title: String,
    pub last_updated: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
}

impl FeedSnapshot {
    /// Khởi tạo snapshot từ các bài đã chuẩn bị.
    pub fn new(title: String, entries: Vec<FeedEntry>) -> Self {
        Self {
            title,
            last_updated: Utc::now(),
            entries,
        }
    }

    /// Danh sách bài theo thứ tự xuất hiện trong feed.
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }
}

/// Phím tắt của trang đọc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    RefreshFeeds,
    ScrollToTop,
    ShowHelp,
    CloseHelp,
}

/// Ánh xạ một phím sang hành động. `has_modifier` là Ctrl hoặc Meta;
/// Escape vẫn đóng trợ giúp kể cả khi giữ modifier.
pub fn shortcut_for(key: &str, has_modifier: bool) -> Option<ShortcutAction> {
    match key.to_lowercase().as_str() {
        "r" if !has_modifier => Some(ShortcutAction::RefreshFeeds),
        "t" if !has_modifier => Some(ShortcutAction::ScrollToTop),
        "h" if !has_modifier => Some(ShortcutAction::ShowHelp),
        "escape" => Some(ShortcutAction::CloseHelp),
        _ => None,
    }
}

/// Nhãn thời gian tương đối, làm tròn xuống theo phút.
pub fn format_relative_time(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(published).num_minutes();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} minute{} ago", plural_suffix(minutes))
    } else if minutes < 1440 {
        let hours = minutes / 60;
        format!("{hours} hour{} ago", plural_suffix(hours))
    } else {
        let days = minutes / 1440;
        format!("{days} day{} ago", plural_suffix(days))
    }
}

/// Đồng hồ 12 giờ dạng "09:05 am".
pub fn format_clock_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %P").to_string()
}

/// Đọc timestamp RFC 3339 (thuộc tính `data-timestamp`) hoặc RFC 2822
/// (`pubDate` của RSS).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn plural_suffix(count: i64) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// Lỗi chung của trang đọc feed.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Không tải được feed: {0}")]
    Fetch(String),
    #[error("Lỗi khác: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(minutes_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        (now - Duration::minutes(minutes_ago), now)
    }

    #[test]
    fn relative_time_just_now_under_one_minute() {
        let (then, now) = at(0);
        assert_eq!(format_relative_time(then, now), "Just now");
    }

    #[test]
    fn relative_time_future_timestamp_is_just_now() {
        let (then, now) = at(-10);
        assert_eq!(format_relative_time(then, now), "Just now");
    }

    #[test]
    fn relative_time_minutes_with_pluralization() {
        let (then, now) = at(1);
        assert_eq!(format_relative_time(then, now), "1 minute ago");
        let (then, now) = at(45);
        assert_eq!(format_relative_time(then, now), "45 minutes ago");
        let (then, now) = at(59);
        assert_eq!(format_relative_time(then, now), "59 minutes ago");
    }

    #[test]
    fn relative_time_ninety_minutes_is_one_hour() {
        let (then, now) = at(90);
        assert_eq!(format_relative_time(then, now), "1 hour ago");
    }

    #[test]
    fn relative_time_hour_boundaries() {
        let (then, now) = at(60);
        assert_eq!(format_relative_time(then, now), "1 hour ago");
        let (then, now) = at(120);
        assert_eq!(format_relative_time(then, now), "2 hours ago");
        let (then, now) = at(1439);
        assert_eq!(format_relative_time(then, now), "23 hours ago");
    }

    #[test]
    fn relative_time_day_boundaries() {
        let (then, now) = at(1440);
        assert_eq!(format_relative_time(then, now), "1 day ago");
        let (then, now) = at(1440 * 3 + 30);
        assert_eq!(format_relative_time(then, now), "3 days ago");
    }

    #[test]
    fn clock_time_is_two_digit_twelve_hour() {
        let morning = Utc.with_ymd_and_hms(2026, 8, 7, 9, 5, 0).unwrap();
        assert_eq!(format_clock_time(&morning), "09:05 am");
        let evening = Utc.with_ymd_and_hms(2026, 8, 7, 23, 59, 0).unwrap();
        assert_eq!(format_clock_time(&evening), "11:59 pm");
        let midnight = Utc.with_ymd_and_hms(2026, 8, 7, 0, 30, 0).unwrap();
        assert_eq!(format_clock_time(&midnight), "12:30 am");
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_rfc2822() {
        let expected = Utc.with_ymd_and_hms(2026, 8, 7, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-08-07T10:30:00Z"), Some(expected));
        assert_eq!(
            parse_timestamp("Fri, 07 Aug 2026 10:30:00 +0000"),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(" 2026-08-07T10:30:00+00:00 "),
            Some(expected)
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("No date available"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn entry_date_labels() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let known = EntryDate::Known(now - Duration::minutes(90));
        assert_eq!(known.relative_label(now), "1 hour ago");
        assert_eq!(EntryDate::Missing.relative_label(now), "No date available");
        assert_eq!(EntryDate::Invalid.relative_label(now), "Invalid date format");
    }

    #[test]
    fn shortcuts_map_plain_keys_only() {
        assert_eq!(shortcut_for("r", false), Some(ShortcutAction::RefreshFeeds));
        assert_eq!(shortcut_for("T", false), Some(ShortcutAction::ScrollToTop));
        assert_eq!(shortcut_for("h", false), Some(ShortcutAction::ShowHelp));
        assert_eq!(shortcut_for("r", true), None);
        assert_eq!(shortcut_for("h", true), None);
        assert_eq!(shortcut_for("x", false), None);
    }

    #[test]
    fn escape_closes_help_even_with_modifier() {
        assert_eq!(shortcut_for("Escape", false), Some(ShortcutAction::CloseHelp));
        assert_eq!(shortcut_for("escape", true), Some(ShortcutAction::CloseHelp));
    }

    #[test]
    fn default_config_matches_page_timings() {
        let config = ReaderConfig::default();
        assert_eq!(config.relative_tick_secs, 60);
        assert_eq!(config.auto_refresh_secs, 300);
        assert_eq!(config.max_entries_per_feed, 5);
        assert_eq!(config.cache_ttl_secs, 300);
    }
}
