//! Exhibition records shared by the crawlers, the update pass, and the API.

use serde::{Deserialize, Serialize};

/// One exhibition as persisted in the JSON data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exhibition {
    /// Site-native identifier, unique per source site.
    pub id: String,
    /// Raw display title.
    pub title: String,
    /// Venue name with any trailing `/region` suffix stripped.
    pub place: String,
    /// Street address; falls back to the place name when unavailable.
    pub address: String,
    /// Latitude; 0.0 means "unknown location".
    pub lat: f64,
    /// Longitude; 0.0 means "unknown location".
    pub lng: f64,
    /// ISO `YYYY-MM-DD` start date.
    pub start_date: String,
    /// ISO `YYYY-MM-DD` end date; empty means open-ended.
    pub end_date: String,
    /// Absolute thumbnail URL or empty.
    pub thumbnail: String,
    /// Naver blog mention count; `None` means not yet computed or API
    /// unavailable. Absent in files written before the count pass existed.
    #[serde(default)]
    pub blog_count: Option<u64>,
}

impl Exhibition {
    /// True when both coordinates are known. Records failing this check are
    /// excluded from persisted output.
    pub fn has_coordinates(&self) -> bool {
        self.lat != 0.0 && self.lng != 0.0
    }

    /// True when the exhibition is still running on `today` (ISO date
    /// string). Open-ended exhibitions always count as ongoing.
    pub fn is_ongoing(&self, today: &str) -> bool {
        self.end_date.is_empty() || self.end_date.as_str() >= today
    }
}

/// Four-tier popularity classification derived from the blog mention count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityLevel {
    /// 100 or more blog mentions.
    Hot,
    /// 30 to 99 blog mentions.
    Warm,
    /// 10 to 29 blog mentions.
    Mild,
    /// Fewer than 10 mentions, or count unknown.
    Cold,
}

impl PopularityLevel {
    /// Classifies a blog count; an unknown count is `Cold`.
    pub fn from_count(count: Option<u64>) -> Self {
        match count {
            Some(n) if n >= 100 => Self::Hot,
            Some(n) if n >= 30 => Self::Warm,
            Some(n) if n >= 10 => Self::Mild,
            _ => Self::Cold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lng: f64, end_date: &str) -> Exhibition {
        Exhibition {
            id: "1".into(),
            title: "전시".into(),
            place: "갤러리".into(),
            address: "갤러리".into(),
            lat,
            lng,
            start_date: "2026-01-01".into(),
            end_date: end_date.into(),
            thumbnail: String::new(),
            blog_count: None,
        }
    }

    #[test]
    fn zero_coordinate_is_unknown_location() {
        assert!(!record(0.0, 37.5, "").has_coordinates());
        assert!(!record(37.5, 0.0, "").has_coordinates());
        assert!(record(37.5, 127.0, "").has_coordinates());
    }

    #[test]
    fn ongoing_compares_iso_dates() {
        let today = "2026-03-01";
        assert!(record(1.0, 1.0, "2026-03-01").is_ongoing(today));
        assert!(record(1.0, 1.0, "2026-04-15").is_ongoing(today));
        assert!(!record(1.0, 1.0, "2026-02-28").is_ongoing(today));
        assert!(record(1.0, 1.0, "").is_ongoing(today));
    }

    #[test]
    fn popularity_thresholds() {
        assert_eq!(PopularityLevel::from_count(Some(250)), PopularityLevel::Hot);
        assert_eq!(PopularityLevel::from_count(Some(100)), PopularityLevel::Hot);
        assert_eq!(PopularityLevel::from_count(Some(99)), PopularityLevel::Warm);
        assert_eq!(PopularityLevel::from_count(Some(30)), PopularityLevel::Warm);
        assert_eq!(PopularityLevel::from_count(Some(10)), PopularityLevel::Mild);
        assert_eq!(PopularityLevel::from_count(Some(9)), PopularityLevel::Cold);
        assert_eq!(PopularityLevel::from_count(None), PopularityLevel::Cold);
    }

    #[test]
    fn serializes_camel_case_with_null_count() {
        let json = serde_json::to_value(record(37.5, 127.0, "2026-04-01")).unwrap();
        assert_eq!(json["startDate"], "2026-01-01");
        assert_eq!(json["endDate"], "2026-04-01");
        assert!(json["blogCount"].is_null());
    }
}
