use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::compare::{ComparisonSet, ToggleOutcome};
use crate::filter::FilterState;
use crate::offer::{Offer, OfferId, ValidationPolicy};
use crate::pager::{Page, Pager, DEFAULT_PAGE_SIZE};
use crate::pipeline::{self, BuildFailure, LoadReport};
use crate::stats::{self, ChartSeries, SummaryStats};
use crate::utils;

pub const DEFAULT_LAST_UPDATED_URL: &str =
    "https://api.github.com/repos/kuutsav/leetcode-compensation/commits?sha=master&path=data&per_page=1";
pub const LAST_UPDATED_FALLBACK: &str = "Recently";

#[derive(Clone, Debug)]
pub enum DataSource {
    FilePath(String),
    Url(String),
    Inline(Value),
}

impl DataSource {
    /// `http(s)://` locations are fetched, anything else is read from disk.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::FilePath(trimmed.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::FilePath(p) => p.clone(),
            Self::Url(u) => u.clone(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Options {
    pub source: DataSource,
    pub timeout_seconds: u64,
    pub validation: ValidationPolicy,
    pub page_size: usize,
    pub overflow_bucket: bool,
    pub filters: FilterState,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: DataSource::FilePath("./data/parsed_comps.json".to_string()),
            timeout_seconds: 10,
            validation: ValidationPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            overflow_bucket: false,
            filters: FilterState::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read data file: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch data: {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch data: {url}: HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to parse JSON from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid data format: expected an array of offers")]
    NotAnArray,

    #[error("empty data array received")]
    Empty,

    #[error("no valid offers found in the data ({received} entries received)")]
    NoValidOffers { received: usize },
}

impl From<BuildFailure> for LoadError {
    fn from(value: BuildFailure) -> Self {
        match value {
            BuildFailure::NotAnArray => Self::NotAnArray,
            BuildFailure::Empty => Self::Empty,
            BuildFailure::NoValidOffers { received } => Self::NoValidOffers { received },
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid page_size {value}, expected positive integer")]
    InvalidPageSize { value: usize },

    #[error("invalid {field} range {min}-{max}, MIN must not exceed MAX")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid timeout {value}, expected positive number of seconds")]
    InvalidTimeout { value: u64 },

    #[error(transparent)]
    Load(#[from] LoadError),
}

fn validate_filters(filters: &FilterState) -> Result<(), RunnerError> {
    if filters.yoe_min > filters.yoe_max {
        return Err(RunnerError::InvalidRange {
            field: "yoe",
            min: filters.yoe_min,
            max: filters.yoe_max,
        });
    }
    if filters.salary_min > filters.salary_max {
        return Err(RunnerError::InvalidRange {
            field: "salary",
            min: filters.salary_min,
            max: filters.salary_max,
        });
    }
    Ok(())
}

fn build_http_client(timeout_seconds: u64) -> Result<reqwest::Client, LoadError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("compboard/", env!("CARGO_PKG_VERSION"))),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| LoadError::HttpClientBuild { source: e })
}

/// Produces the raw payload for a source. Only transport and JSON syntax are
/// checked here; shape checks happen when the master set is built.
pub async fn load_raw(source: &DataSource, timeout_seconds: u64) -> Result<Value, LoadError> {
    match source {
        DataSource::Inline(value) => Ok(value.clone()),
        DataSource::FilePath(path) => {
            let contents =
                tokio::fs::read(path)
                    .await
                    .map_err(|e| LoadError::FileRead {
                        path: path.clone(),
                        source: e,
                    })?;
            serde_json::from_slice(&contents).map_err(|e| LoadError::Parse {
                origin: path.clone(),
                source: e,
            })
        }
        DataSource::Url(url) => {
            let client = build_http_client(timeout_seconds)?;
            debug!("fetching offers from {url}");
            let resp = client.get(url).send().await.map_err(|e| LoadError::Fetch {
                url: url.clone(),
                source: e,
            })?;
            if !resp.status().is_success() {
                return Err(LoadError::HttpStatus {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            let body = resp.bytes().await.map_err(|e| LoadError::Fetch {
                url: url.clone(),
                source: e,
            })?;
            serde_json::from_slice(&body).map_err(|e| LoadError::Parse {
                origin: url.clone(),
                source: e,
            })
        }
    }
}

fn commit_date(payload: &Value) -> Option<DateTime<Utc>> {
    payload
        .get(0)?
        .get("commit")?
        .get("committer")?
        .get("date")?
        .as_str()
        .and_then(utils::parse_date)
}

/// "time ago" of the newest data commit. Never fails: any problem yields the
/// fallback label.
pub async fn fetch_last_updated(url: &str, timeout_seconds: u64) -> String {
    let payload = match load_raw(&DataSource::Url(url.to_string()), timeout_seconds).await {
        Ok(payload) => payload,
        Err(e) => {
            debug!("last-updated lookup failed: {e}");
            return LAST_UPDATED_FALLBACK.to_string();
        }
    };
    match commit_date(&payload) {
        Some(date) => utils::time_ago(date, Utc::now()),
        None => LAST_UPDATED_FALLBACK.to_string(),
    }
}

/// The dashboard state for one load of the data: the immutable master set, the
/// current filters and their result, the page cursor and the comparison set.
#[derive(Clone, Debug)]
pub struct Dashboard {
    master: Vec<Offer>,
    report: LoadReport,
    filters: FilterState,
    filtered: Vec<Offer>,
    pager: Pager,
    comparison: ComparisonSet,
    validation: ValidationPolicy,
    overflow_bucket: bool,
}

impl Dashboard {
    pub fn from_raw(raw: &Value, options: &Options) -> Result<Self, RunnerError> {
        if options.page_size == 0 {
            return Err(RunnerError::InvalidPageSize {
                value: options.page_size,
            });
        }
        validate_filters(&options.filters)?;
        let master = pipeline::build_master_set(raw, &options.validation).map_err(LoadError::from)?;
        let filtered = options.filters.apply(&master.offers);
        Ok(Self {
            master: master.offers,
            report: master.report,
            filters: options.filters.clone(),
            filtered,
            pager: Pager::new(options.page_size),
            comparison: ComparisonSet::new(),
            validation: options.validation,
            overflow_bucket: options.overflow_bucket,
        })
    }

    pub async fn load(options: &Options) -> Result<Self, RunnerError> {
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        let raw = load_raw(&options.source, options.timeout_seconds).await?;
        let dashboard = Self::from_raw(&raw, options)?;
        info!(
            "{} offers ready from {}",
            dashboard.master.len(),
            options.source.describe()
        );
        Ok(dashboard)
    }

    /// Replaces the master set wholesale. On failure the current state is kept.
    pub fn reload(&mut self, raw: &Value) -> Result<(), RunnerError> {
        let master = pipeline::build_master_set(raw, &self.validation).map_err(LoadError::from)?;
        self.master = master.offers;
        self.report = master.report;
        self.comparison.clear();
        self.filtered = self.filters.apply(&self.master);
        self.pager.reset();
        Ok(())
    }

    pub fn master(&self) -> &[Offer] {
        &self.master
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filtered(&self) -> &[Offer] {
        &self.filtered
    }

    pub fn find(&self, id: &OfferId) -> Option<&Offer> {
        self.master.iter().find(|o| &o.id == id)
    }

    pub fn apply_filters(&mut self, filters: FilterState) -> Result<&[Offer], RunnerError> {
        validate_filters(&filters)?;
        self.filtered = filters.apply(&self.master);
        self.filters = filters;
        self.pager.reset();
        Ok(&self.filtered)
    }

    pub fn clear_filters(&mut self) -> &[Offer] {
        self.filters = FilterState::default();
        self.filtered = self.master.clone();
        self.pager.reset();
        &self.filtered
    }

    pub fn summary(&self) -> SummaryStats {
        stats::summary_stats(&self.filtered)
    }

    pub fn charts(&self) -> ChartSeries {
        ChartSeries::compute(&self.filtered, self.overflow_bucket)
    }

    pub fn page(&self) -> Page<'_, Offer> {
        self.pager.slice(&self.filtered)
    }

    pub fn go_to_page(&mut self, page: usize) -> Page<'_, Offer> {
        self.pager.go_to(page, self.filtered.len());
        self.page()
    }

    pub fn next_page(&mut self) -> Page<'_, Offer> {
        self.pager.next(self.filtered.len());
        self.page()
    }

    pub fn prev_page(&mut self) -> Page<'_, Offer> {
        self.pager.prev(self.filtered.len());
        self.page()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), RunnerError> {
        if page_size == 0 {
            return Err(RunnerError::InvalidPageSize { value: page_size });
        }
        self.pager.set_page_size(page_size);
        Ok(())
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    /// Pins or unpins the master-set offer with `id`. `None` when no such offer exists.
    pub fn toggle_comparison(&mut self, id: &OfferId) -> Option<ToggleOutcome> {
        let offer = self.master.iter().find(|o| &o.id == id)?;
        let outcome = self.comparison.toggle(offer);
        if let Some(msg) = outcome.warning() {
            warn!("{msg}");
        }
        Some(outcome)
    }

    pub fn remove_from_comparison(&mut self, id: &OfferId) -> bool {
        self.comparison.remove(id)
    }

    pub fn clear_comparison(&mut self) {
        self.comparison.clear();
    }
}
