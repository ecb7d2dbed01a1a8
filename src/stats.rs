use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::offer::Offer;
use crate::utils::round1;

pub const HISTOGRAM_BUCKETS: usize = 20;
pub const HISTOGRAM_WIDTH: u32 = 10;
pub const SPREAD_MIN_OFFERS: usize = 3;
pub const SPREAD_TOP: usize = 10;
pub const TOP_COMPANIES: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub avg_total: f64,
    pub distinct_companies: usize,
}

pub fn summary_stats(offers: &[Offer]) -> SummaryStats {
    if offers.is_empty() {
        return SummaryStats::default();
    }
    let sum: f64 = offers.iter().map(|o| o.total).sum();
    SummaryStats {
        count: offers.len(),
        avg_total: round1(sum / offers.len() as f64),
        distinct_companies: offers.iter().map(|o| o.company.as_str()).unique().count(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub label: String,
    pub min: u32,
    /// Inclusive upper bound; `None` for the open-ended overflow bucket.
    pub max: Option<u32>,
    pub count: usize,
}

/// Counts offers into twenty inclusive `[min, min + 9]` LPA buckets. Totals of 200
/// and above land in no bucket unless `overflow_bucket` adds a trailing `200+`.
pub fn salary_histogram(offers: &[Offer], overflow_bucket: bool) -> Vec<HistogramBucket> {
    let mut buckets: Vec<HistogramBucket> = (0..HISTOGRAM_BUCKETS as u32)
        .map(|i| {
            let min = i * HISTOGRAM_WIDTH;
            let max = min + HISTOGRAM_WIDTH - 1;
            let count = offers
                .iter()
                .filter(|o| o.total >= min as f64 && o.total <= max as f64)
                .count();
            HistogramBucket {
                label: format!("{min}-{max}"),
                min,
                max: Some(max),
                count,
            }
        })
        .collect();
    if overflow_bucket {
        let min = HISTOGRAM_BUCKETS as u32 * HISTOGRAM_WIDTH;
        buckets.push(HistogramBucket {
            label: format!("{min}+"),
            min,
            max: None,
            count: offers.iter().filter(|o| o.total >= min as f64).count(),
        });
    }
    buckets
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

// counts in first-seen order
fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<LabelCount> = Vec::new();
    for label in labels {
        match index.get(label) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(label, out.len());
                out.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }
    out
}

/// Offers per experience level; a missing `mapped_yoe` counts as "Unknown".
pub fn experience_distribution(offers: &[Offer]) -> Vec<LabelCount> {
    tally(offers.iter().map(|o| o.experience_level()))
}

/// The `limit` companies with the most offers. Ties keep first-seen order.
pub fn top_companies(offers: &[Offer], limit: usize) -> Vec<LabelCount> {
    let mut counts = tally(offers.iter().map(|o| o.company.as_str()));
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Linear interpolation between order statistics. `sorted` must be ascending.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let index = (p / 100.0) * (n - 1) as f64;
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    if hi >= n {
        return Some(sorted[n - 1]);
    }
    let w = index - lo as f64;
    Some(sorted[lo] * (1.0 - w) + sorted[hi] * w)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanySpread {
    pub company: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl CompanySpread {
    fn from_totals(company: &str, mut totals: Vec<f64>) -> Option<Self> {
        totals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Some(Self {
            company: company.to_string(),
            count: totals.len(),
            min: *totals.first()?,
            q1: percentile(&totals, 25.0)?,
            median: percentile(&totals, 50.0)?,
            q3: percentile(&totals, 75.0)?,
            max: *totals.last()?,
        })
    }

    /// Box-plot tuple `[min, q1, median, q3, max]`.
    pub fn five_numbers(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}

/// Five-number summaries of `total` for companies with at least three offers,
/// highest median first.
pub fn company_salary_spread(offers: &[Offer], limit: usize) -> Vec<CompanySpread> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Vec<f64>> = HashMap::new();
    for o in offers {
        let entry = totals.entry(o.company.as_str()).or_insert_with(|| {
            order.push(o.company.as_str());
            Vec::new()
        });
        entry.push(o.total);
    }

    let mut spreads: Vec<CompanySpread> = order
        .into_iter()
        .filter_map(|company| {
            let values = totals.remove(company)?;
            if values.len() < SPREAD_MIN_OFFERS {
                return None;
            }
            CompanySpread::from_totals(company, values)
        })
        .collect();
    spreads.sort_by(|a, b| b.median.partial_cmp(&a.median).unwrap_or(Ordering::Equal));
    spreads.truncate(limit);
    spreads
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    pub salary_histogram: Vec<HistogramBucket>,
    pub experience_distribution: Vec<LabelCount>,
    pub company_spread: Vec<CompanySpread>,
    pub top_companies: Vec<LabelCount>,
}

impl ChartSeries {
    pub fn compute(offers: &[Offer], overflow_bucket: bool) -> Self {
        Self {
            salary_histogram: salary_histogram(offers, overflow_bucket),
            experience_distribution: experience_distribution(offers),
            company_spread: company_salary_spread(offers, SPREAD_TOP),
            top_companies: top_companies(offers, TOP_COMPANIES),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.experience_distribution.is_empty()
    }
}
