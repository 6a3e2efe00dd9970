//! Download metrics models and the dashboard aggregation over them.

use serde::{Deserialize, Serialize};

/// Device platform a bundle was downloaded to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ios" => Some(Platform::Ios),
            "android" => Some(Platform::Android),
            _ => None,
        }
    }
}

/// Per-release, per-platform download counter. Increment-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadMetric {
    pub release_id: String,
    pub platform: String,
    pub count: i64,
}

/// Aggregates derived from the stored metrics for dashboard display.
///
/// Summation and percentage derivation only; percentages are rounded to the
/// nearest integer and zero when there are no downloads at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSummary {
    pub total_downloads: i64,
    pub ios_downloads: i64,
    pub android_downloads: i64,
    pub ios_percent: i64,
    pub android_percent: i64,
}

impl TrackingSummary {
    pub fn from_metrics(metrics: &[DownloadMetric]) -> Self {
        let sum_for = |platform: Platform| -> i64 {
            metrics
                .iter()
                .filter(|m| m.platform == platform.as_str())
                .map(|m| m.count)
                .sum()
        };

        let ios_downloads = sum_for(Platform::Ios);
        let android_downloads = sum_for(Platform::Android);
        let total_downloads: i64 = metrics.iter().map(|m| m.count).sum();

        let percent = |part: i64| -> i64 {
            if total_downloads > 0 {
                (part as f64 / total_downloads as f64 * 100.0).round() as i64
            } else {
                0
            }
        };

        Self {
            total_downloads,
            ios_downloads,
            android_downloads,
            ios_percent: percent(ios_downloads),
            android_percent: percent(android_downloads),
        }
    }
}
