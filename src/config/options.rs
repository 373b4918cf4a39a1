// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use super::facility::Facility;
use crate::decompose::NameLayout;

/// Everything the collector needs to reach the dashboard and shape records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub base_url: String,
    pub project: String,
    pub timeout_secs: u64,
    pub facility: Facility,
    pub targets: Vec<String>,
    pub layout: NameLayout,
    pub lookback_days: Option<u32>,
    pub placeholders: bool,
}

impl FetchOptions {
    pub fn for_facility(facility: Facility) -> Self {
        Self {
            base_url: s!(DEFAULT_BASE_URL),
            project: s!(DEFAULT_PROJECT),
            timeout_secs: TIMEOUT_SECS,
            facility,
            targets: facility.default_targets(),
            layout: facility.layout(),
            lookback_days: facility.default_lookback_days(),
            placeholders: true,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), API_PATH)
    }

    pub fn page_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PAGE_PATH)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::for_facility(Facility::Vortex)
    }
}

/// Labels and table shape for the Markdown report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportMeta {
    pub project: String,
    pub label: String,
    pub layout: NameLayout,
}

impl ReportMeta {
    pub fn from_fetch(fetch: &FetchOptions) -> Self {
        Self {
            project: fetch.project.clone(),
            label: s!(fetch.facility.label()),
            layout: fetch.layout,
        }
    }

    pub fn title(&self) -> String {
        format!("{} {} Test Results Report", self.project, self.label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub fetch: FetchOptions,
    pub meta: ReportMeta,
    pub csv: PathBuf,
    pub markdown: PathBuf,
    pub skip_fetch: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        let fetch = FetchOptions::default();
        Self {
            meta: ReportMeta::from_fetch(&fetch),
            fetch,
            csv: PathBuf::from(DEFAULT_CSV),
            markdown: PathBuf::from(DEFAULT_MARKDOWN),
            skip_fetch: false,
        }
    }
}
