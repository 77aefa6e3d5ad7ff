//! Page-speed result and PageSpeed Insights payload types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SCORE: u32 = 50;
pub const DEFAULT_FCP_MS: f64 = 3000.0;
pub const DEFAULT_LCP_MS: f64 = 5000.0;
pub const DEFAULT_CLS: f64 = 0.15;
pub const DEFAULT_TBT_MS: f64 = 500.0;
pub const DEFAULT_SPEED_INDEX_MS: f64 = 4000.0;
pub const DEFAULT_INTERACTIVE_MS: f64 = 5000.0;

/// Performance fraction assumed when Lighthouse omits the category score
const DEFAULT_PERFORMANCE_FRACTION: f64 = 0.5;

/// Mobile performance measurements for one URL
///
/// Timings are milliseconds; `cls` is unitless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResult {
    /// Lighthouse performance score, 0–100
    pub score: u32,
    pub fcp: f64,
    pub lcp: f64,
    pub cls: f64,
    pub tbt: f64,
    pub speed_index: f64,
    pub interactive: f64,
    /// Why the defaults were used, if they were
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageSpeedResult {
    /// The fallback measurements, tagged with the reason they were used
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Returns true if these are fallback values rather than measurements
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for PageSpeedResult {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            fcp: DEFAULT_FCP_MS,
            lcp: DEFAULT_LCP_MS,
            cls: DEFAULT_CLS,
            tbt: DEFAULT_TBT_MS,
            speed_index: DEFAULT_SPEED_INDEX_MS,
            interactive: DEFAULT_INTERACTIVE_MS,
            error: None,
        }
    }
}

/// The subset of a PageSpeed Insights v5 response that is read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsiResponse {
    #[serde(default)]
    pub lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub categories: LighthouseCategories,
    #[serde(default)]
    pub audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseCategories {
    #[serde(default)]
    pub performance: Option<LighthouseCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseCategory {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseAudit {
    #[serde(default)]
    pub numeric_value: Option<f64>,
}

impl LighthouseResult {
    fn metric(&self, audit: &str, default: f64) -> f64 {
        self.audits
            .get(audit)
            .and_then(|a| a.numeric_value)
            .unwrap_or(default)
    }

    /// Converts the Lighthouse payload into measurements
    ///
    /// Absent values fall back to the defaults individually. A reported
    /// zero is kept.
    pub fn to_result(&self) -> PageSpeedResult {
        let fraction = self
            .categories
            .performance
            .as_ref()
            .and_then(|p| p.score)
            .unwrap_or(DEFAULT_PERFORMANCE_FRACTION);

        PageSpeedResult {
            score: (fraction * 100.0).round().clamp(0.0, 100.0) as u32,
            fcp: self.metric("first-contentful-paint", DEFAULT_FCP_MS),
            lcp: self.metric("largest-contentful-paint", DEFAULT_LCP_MS),
            cls: self.metric("cumulative-layout-shift", DEFAULT_CLS),
            tbt: self.metric("total-blocking-time", DEFAULT_TBT_MS),
            speed_index: self.metric("speed-index", DEFAULT_SPEED_INDEX_MS),
            interactive: self.metric("interactive", DEFAULT_INTERACTIVE_MS),
            error: None,
        }
    }
}
