// src/scrape.rs
//! The fetch side of the pipeline: fallback chain, filtering, decomposition.
//!
//! For each period the collector walks [`SOURCES`] in order and stops at the first
//! one that yields at least one matching build:
//!
//! ```text
//! GroupApi(FilterData) → GroupApi(BuildGroup) → GroupApi(Filter)
//!     → GroupPage → ProjectPage → Api
//! ```
//!
//! A failed request or an unreadable body counts as "nothing here" and moves on to the
//! next source. Placeholder records are the last resort for the whole run, never for a
//! single period.

use chrono::{Days, NaiveDate, SecondsFormat, Utc};
use reqwest::Url;

use crate::{
    config::consts::{DATE_FMT, HPC_GROUP},
    config::FetchOptions,
    core::Transport,
    filter::SiteFilter,
    progress::Progress,
    record::{BuildRecord, Counts, RawBuild},
    specs::{api, page},
};

/// The three URL shapes CDash versions have used for group filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupShape {
    /// `filterdata={"filters":{"buildgroup":"HPC"}}`
    FilterData,
    /// `buildgroup=HPC`
    BuildGroup,
    /// `filter=HPC`
    Filter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    GroupApi(GroupShape),
    GroupPage,
    ProjectPage,
    Api,
}

pub const SOURCES: [Source; 6] = [
    Source::GroupApi(GroupShape::FilterData),
    Source::GroupApi(GroupShape::BuildGroup),
    Source::GroupApi(GroupShape::Filter),
    Source::GroupPage,
    Source::ProjectPage,
    Source::Api,
];

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::GroupApi(GroupShape::FilterData) => "group API (filterdata)",
            Source::GroupApi(GroupShape::BuildGroup) => "group API (buildgroup)",
            Source::GroupApi(GroupShape::Filter) => "group API (filter)",
            Source::GroupPage => "HPC page",
            Source::ProjectPage => "project page",
            Source::Api => "API",
        }
    }

    pub fn url(self, opts: &FetchOptions, date: Option<&str>) -> String {
        let base = match self {
            Source::GroupApi(_) | Source::Api => opts.api_url(),
            Source::GroupPage | Source::ProjectPage => opts.page_url(),
        };

        let filterdata = format!(r#"{{"filters":{{"buildgroup":"{HPC_GROUP}"}}}}"#);
        let mut params: Vec<(&str, &str)> = vec![("project", opts.project.as_str())];
        match self {
            Source::GroupApi(GroupShape::FilterData) => params.push(("filterdata", filterdata.as_str())),
            Source::GroupApi(GroupShape::BuildGroup) => params.push(("buildgroup", HPC_GROUP)),
            Source::GroupApi(GroupShape::Filter) => params.push(("filter", HPC_GROUP)),
            _ => {}
        }
        if let Some(d) = date {
            params.push(("date", d));
        }

        match Url::parse_with_params(&base, &params) {
            Ok(u) => u.into(),
            Err(e) => {
                tracing::warn!(%base, error = %e, "bad base URL");
                base
            }
        }
    }

    fn extract(self, body: &str) -> Vec<RawBuild> {
        match self {
            Source::GroupApi(_) | Source::Api => api::parse_api(body),
            Source::GroupPage => page::hpc_fragments(body)
                .into_iter()
                .flat_map(page::parse_build_table)
                .collect(),
            Source::ProjectPage => page::parse_build_table(body),
        }
    }
}

/// The periods to fetch: `[None]` for the current dashboard alone, otherwise
/// `today, today-1, …` for `days` days.
pub fn lookback_dates(today: NaiveDate, days: Option<u32>) -> Vec<Option<String>> {
    match days {
        None | Some(0) => vec![None],
        Some(n) => (0..u64::from(n))
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|d| Some(d.format(DATE_FMT).to_string()))
            .collect(),
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct Collector<'a, T: Transport> {
    transport: T,
    opts: &'a FetchOptions,
    filter: SiteFilter,
}

impl<'a, T: Transport> Collector<'a, T> {
    pub fn new(transport: T, opts: &'a FetchOptions) -> Self {
        Self {
            transport,
            filter: SiteFilter::new(&opts.targets),
            opts,
        }
    }

    /// Body text, or empty when the request failed.
    fn fetch(&self, url: &str) -> String {
        match self.transport.get(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%url, error = %e, "fetch failed");
                s!()
            }
        }
    }

    /// One source for one period: fetch, extract, filter, decompose.
    pub fn attempt(&self, source: Source, date: Option<&str>, timestamp: &str) -> Vec<BuildRecord> {
        let url = source.url(self.opts, date);
        let body = self.fetch(&url);
        if body.trim().is_empty() {
            return Vec::new();
        }

        let found = source.extract(&body);
        let total = found.len();
        let kept: Vec<BuildRecord> = found
            .into_iter()
            .filter(|b| self.filter.matches(&b.site, &b.build_name))
            .map(|b| BuildRecord::new(b, self.opts.layout, timestamp, date))
            .collect();

        tracing::debug!(source = source.label(), total, kept = kept.len(), "source tried");
        kept
    }

    /// Walk the fallback chain for one period; the first non-empty source wins.
    pub fn collect_period(&self, date: Option<&str>, timestamp: &str) -> Option<(Source, Vec<BuildRecord>)> {
        SOURCES.iter().find_map(|&source| {
            let records = self.attempt(source, date, timestamp);
            (!records.is_empty()).then_some((source, records))
        })
    }

    /// All periods in order, then placeholders if nothing at all was found.
    pub fn collect(
        &self,
        dates: &[Option<String>],
        mut progress: Option<&mut dyn Progress>,
    ) -> Vec<BuildRecord> {
        if let Some(p) = progress.as_deref_mut() {
            p.begin(dates.len());
        }

        let timestamp = now_stamp();
        let mut records = Vec::new();

        for date in dates {
            let label = date.as_deref().unwrap_or("current");
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!(
                    "Fetching {} {} results for {label}…",
                    self.opts.project,
                    self.opts.facility.label()
                ));
            }

            let found = match self.collect_period(date.as_deref(), &timestamp) {
                Some((source, found)) => {
                    tracing::info!(period = label, source = source.label(), builds = found.len(), "period collected");
                    found
                }
                None => {
                    tracing::info!(period = label, "no source returned matching builds");
                    Vec::new()
                }
            };

            if let Some(p) = progress.as_deref_mut() {
                p.period_done(label, found.len());
            }
            records.extend(found);
        }

        if records.is_empty() && self.opts.placeholders {
            tracing::warn!(facility = self.opts.facility.label(), "no real data reachable, using placeholder builds");
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!(
                    "Using sample data for {} - real data not accessible",
                    self.opts.facility.label()
                ));
            }
            records = self.placeholders(&timestamp);
        }

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        records
    }

    /// Synthetic records for the facility, decomposed like real ones.
    pub fn placeholders(&self, timestamp: &str) -> Vec<BuildRecord> {
        let facility = self.opts.facility;
        facility
            .placeholders()
            .iter()
            .map(|p| {
                let raw = RawBuild {
                    site: s!(facility.placeholder_site()),
                    build_name: s!(p.build_name),
                    build_stamp: s!(facility.placeholder_stamp()),
                    counts: Counts { test_passed: p.passed, test_failed: p.failed, ..Counts::default() },
                };
                BuildRecord::new(raw, self.opts.layout, timestamp, None)
            })
            .collect()
    }

    /// Sorted, unique, non-blank build names across every site on the unfiltered API.
    pub fn build_names(&self) -> Vec<String> {
        let body = self.fetch(&Source::Api.url(self.opts, None));
        let mut names: Vec<String> = api::parse_api(&body)
            .into_iter()
            .map(|b| b.build_name)
            .filter(|n| !n.trim().is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
