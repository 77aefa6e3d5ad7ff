//! Page-speed measurement
//!
//! Wraps Google PageSpeed Insights behind the `PageSpeedProvider` trait.
//! The provider never fails: any problem yields fixed fallback values with
//! the reason recorded in `PageSpeedResult::error`.

mod client;
mod types;

pub use client::{PageSpeedClient, PageSpeedError, PageSpeedProvider};
pub use types::{
    LighthouseResult, PageSpeedResult, PsiResponse, DEFAULT_CLS, DEFAULT_FCP_MS,
    DEFAULT_INTERACTIVE_MS, DEFAULT_LCP_MS, DEFAULT_SCORE, DEFAULT_SPEED_INDEX_MS,
    DEFAULT_TBT_MS,
};
