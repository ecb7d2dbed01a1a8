use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::offer::{Offer, OfferId};
use crate::utils::round1;

pub const MAX_COMPARED: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The set is full; nothing changed.
    CapacityReached,
}

impl ToggleOutcome {
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::CapacityReached => {
                Some(format!("Maximum {MAX_COMPARED} offers can be compared"))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    pub avg_total: f64,
    pub spread: f64,
    pub avg_yoe: f64,
    pub max_total: f64,
    pub min_total: f64,
}

/// Offers pinned for side-by-side comparison: at most five, unique by id, kept in
/// the order they were added.
#[derive(Clone, Debug, Default)]
pub struct ComparisonSet {
    members: Vec<Offer>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[Offer] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_COMPARED
    }

    pub fn contains(&self, id: &OfferId) -> bool {
        self.members.iter().any(|o| &o.id == id)
    }

    /// Adds `offer`, or removes it when a member with the same id is already present.
    pub fn toggle(&mut self, offer: &Offer) -> ToggleOutcome {
        if let Some(pos) = self.members.iter().position(|o| o.id == offer.id) {
            self.members.remove(pos);
            return ToggleOutcome::Removed;
        }
        if self.is_full() {
            return ToggleOutcome::CapacityReached;
        }
        self.members.push(offer.clone());
        ToggleOutcome::Added
    }

    pub fn remove(&mut self, id: &OfferId) -> bool {
        let before = self.members.len();
        self.members.retain(|o| &o.id != id);
        before != self.members.len()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Only defined once two or more offers are pinned.
    pub fn metrics(&self) -> Option<ComparisonMetrics> {
        if self.members.len() < 2 {
            return None;
        }
        let n = self.members.len() as f64;
        let totals = self.members.iter().map(|o| o.total);
        let max_total = totals.clone().fold(f64::NEG_INFINITY, f64::max);
        let min_total = totals.clone().fold(f64::INFINITY, f64::min);
        let avg_total = totals.sum::<f64>() / n;
        let avg_yoe = self.members.iter().map(|o| o.yoe).sum::<f64>() / n;
        Some(ComparisonMetrics {
            avg_total,
            spread: max_total - min_total,
            avg_yoe: round1(avg_yoe),
            max_total,
            min_total,
        })
    }

    /// Snapshot for download. `None` when nothing is pinned.
    pub fn export(&self, now: DateTime<Utc>) -> Option<ComparisonExport> {
        if self.members.is_empty() {
            return None;
        }
        Some(ComparisonExport {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            metrics: self.metrics().map(|m| ExportMetrics {
                average_salary: m.avg_total,
                salary_difference: m.spread,
                average_experience: m.avg_yoe,
            }),
            offers: self
                .members
                .iter()
                .map(|o| ExportedOffer {
                    company: o.company.clone(),
                    role: o.mapped_role.clone(),
                    location: o.location.clone(),
                    experience: o.yoe,
                    total_compensation: o.total,
                    base_compensation: o.base,
                    date: o.creation_date.clone(),
                })
                .collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetrics {
    pub average_salary: f64,
    pub salary_difference: f64,
    pub average_experience: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedOffer {
    pub company: String,
    pub role: String,
    pub location: String,
    pub experience: f64,
    pub total_compensation: f64,
    pub base_compensation: f64,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonExport {
    pub timestamp: String,
    pub metrics: Option<ExportMetrics>,
    pub offers: Vec<ExportedOffer>,
}

impl ComparisonExport {
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, String> {
        serde_json::to_vec_pretty(self).map_err(|e| format!("failed to serialize comparison: {e}"))
    }
}
