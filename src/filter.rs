use serde::{Deserialize, Serialize};

use crate::offer::Offer;

pub const DEFAULT_YOE_MIN: f64 = 0.0;
pub const DEFAULT_YOE_MAX: f64 = 30.0;
pub const DEFAULT_SALARY_MIN: f64 = 1.0;
pub const DEFAULT_SALARY_MAX: f64 = 200.0;

/// The user's filter selections. Every field at its default is a no-op, so the
/// default state selects the whole master set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub company: String,
    pub location: String,
    pub role: String,
    #[serde(alias = "yoeMin")]
    pub yoe_min: f64,
    #[serde(alias = "yoeMax")]
    pub yoe_max: f64,
    #[serde(alias = "salaryMin")]
    pub salary_min: f64,
    #[serde(alias = "salaryMax")]
    pub salary_max: f64,
    /// Keep only offers that link an interview write-up.
    #[serde(alias = "includeInterviewExp")]
    pub include_interview_exp: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            company: String::new(),
            location: String::new(),
            role: String::new(),
            yoe_min: DEFAULT_YOE_MIN,
            yoe_max: DEFAULT_YOE_MAX,
            salary_min: DEFAULT_SALARY_MIN,
            salary_max: DEFAULT_SALARY_MAX,
            include_interview_exp: false,
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn lowered(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

/// FilterState with text predicates lowercased once, ready to be run against many offers.
#[derive(Clone, Debug)]
pub struct CompiledFilter {
    search: Option<String>,
    company: Option<String>,
    location: Option<String>,
    role: Option<String>,
    yoe_min: Option<f64>,
    yoe_max: Option<f64>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    interview_only: bool,
}

fn bound(value: f64, default: f64) -> Option<f64> {
    if value == default {
        None
    } else {
        Some(value)
    }
}

impl CompiledFilter {
    pub fn matches(&self, offer: &Offer) -> bool {
        if let Some(term) = self.search.as_deref() {
            let hit = [
                offer.company.as_str(),
                offer.location.as_str(),
                offer.role.as_str(),
                offer.mapped_role.as_str(),
            ]
            .iter()
            .any(|field| contains_ci(field, term));
            if !hit {
                return false;
            }
        }
        if let Some(term) = self.company.as_deref() {
            if !contains_ci(&offer.company, term) {
                return false;
            }
        }
        if let Some(term) = self.location.as_deref() {
            if !contains_ci(&offer.location, term) {
                return false;
            }
        }
        if let Some(term) = self.role.as_deref() {
            if !contains_ci(&offer.mapped_role, term) {
                return false;
            }
        }
        if self.yoe_min.is_some_and(|min| offer.yoe < min) {
            return false;
        }
        if self.yoe_max.is_some_and(|max| offer.yoe > max) {
            return false;
        }
        if self.salary_min.is_some_and(|min| offer.total < min) {
            return false;
        }
        if self.salary_max.is_some_and(|max| offer.total > max) {
            return false;
        }
        if self.interview_only && !offer.has_interview_experience() {
            return false;
        }
        true
    }
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            search: lowered(&self.search),
            company: lowered(&self.company),
            location: lowered(&self.location),
            role: lowered(&self.role),
            yoe_min: bound(self.yoe_min, DEFAULT_YOE_MIN),
            yoe_max: bound(self.yoe_max, DEFAULT_YOE_MAX),
            salary_min: bound(self.salary_min, DEFAULT_SALARY_MIN),
            salary_max: bound(self.salary_max, DEFAULT_SALARY_MAX),
            interview_only: self.include_interview_exp,
        }
    }

    pub fn matches(&self, offer: &Offer) -> bool {
        self.compile().matches(offer)
    }

    /// Returns the offers of `master` passing every active predicate, in master order.
    pub fn apply(&self, master: &[Offer]) -> Vec<Offer> {
        if self.is_default() {
            return master.to_vec();
        }
        let compiled = self.compile();
        master
            .iter()
            .filter(|o| compiled.matches(o))
            .cloned()
            .collect()
    }

    /// Short human summary of the active predicates, or `None` when nothing is set.
    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        for (label, value) in [
            ("search", &self.search),
            ("company", &self.company),
            ("location", &self.location),
            ("role", &self.role),
        ] {
            if !value.is_empty() {
                parts.push(format!("{label}={value}"));
            }
        }
        if self.yoe_min != DEFAULT_YOE_MIN || self.yoe_max != DEFAULT_YOE_MAX {
            parts.push(format!("yoe={}-{}", self.yoe_min, self.yoe_max));
        }
        if self.salary_min != DEFAULT_SALARY_MIN || self.salary_max != DEFAULT_SALARY_MAX {
            parts.push(format!("salary={}-{}", self.salary_min, self.salary_max));
        }
        if self.include_interview_exp {
            parts.push("interview=yes".to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}
