use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::offer::{self, Offer, ValidationPolicy};
use crate::utils;

/// Identity used for duplicate detection. Floats are keyed by bit pattern with the
/// zero sign folded so `-0` and `0` collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey {
    company: String,
    role: String,
    location: String,
    yoe: u64,
    total: u64,
    creation_date: String,
}

fn number_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl DedupKey {
    pub fn of(offer: &Offer) -> Self {
        Self {
            company: offer.company.clone(),
            role: offer.role.clone(),
            location: offer.location.clone(),
            yoe: number_key(offer.yoe),
            total: number_key(offer.total),
            creation_date: offer.creation_date.clone(),
        }
    }
}

/// Drops every offer whose key matches an earlier one. First occurrence wins and
/// relative order is preserved.
pub fn deduplicate(offers: Vec<Offer>) -> Vec<Offer> {
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(offers.len());
    let mut out = Vec::with_capacity(offers.len());
    for o in offers {
        let key = DedupKey::of(&o);
        if seen.insert(key) {
            out.push(o);
        } else {
            debug!(
                "duplicate offer dropped: id={} company={} role={} date={}",
                o.id, o.company, o.role, o.creation_date
            );
        }
    }
    out
}

fn compare_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        _ => Ordering::Equal,
    }
}

// Merge sort so an unparsable date can compare equal to everything without
// upsetting the std sort's total-order checks. Stable.
fn merge_sort_by<T, F>(items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort_by(left, cmp);
    let right = merge_sort_by(right, cmp);

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        if let Some(item) = next {
            out.push(item);
        }
    }
    out
}

/// Orders offers newest first by `creation_date`. Pairs where either date fails to
/// parse compare equal and keep their relative order.
pub fn sort_by_recency(offers: Vec<Offer>) -> Vec<Offer> {
    let keyed: Vec<(Option<DateTime<Utc>>, Offer)> = offers
        .into_iter()
        .map(|o| (utils::parse_date(&o.creation_date), o))
        .collect();
    let unparsable = keyed.iter().filter(|(d, _)| d.is_none()).count();
    if unparsable > 0 {
        warn!("{unparsable} offers have an unparsable creation_date; their order is left as loaded");
    }
    merge_sort_by(keyed, &|a, b| compare_dates(a.0, b.0))
        .into_iter()
        .map(|(_, o)| o)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub received: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub loaded: usize,
}

#[derive(Clone, Debug)]
pub struct MasterSet {
    pub offers: Vec<Offer>,
    pub report: LoadReport,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildFailure {
    NotAnArray,
    Empty,
    NoValidOffers { received: usize },
}

/// Validate, deduplicate and sort a raw payload into the master set.
pub fn build_master_set(
    raw: &Value,
    policy: &ValidationPolicy,
) -> Result<MasterSet, BuildFailure> {
    let entries = raw.as_array().ok_or(BuildFailure::NotAnArray)?;
    if entries.is_empty() {
        return Err(BuildFailure::Empty);
    }

    let validated = offer::validate_entries(entries, policy);
    if !validated.rejected.is_empty() {
        warn!(
            "data validation: {} invalid offers skipped out of {}",
            validated.rejected.len(),
            entries.len()
        );
        for (position, reason) in validated.rejected.iter().take(3) {
            debug!("rejected entry #{position}: {reason}");
        }
    }
    if validated.offers.is_empty() {
        return Err(BuildFailure::NoValidOffers {
            received: entries.len(),
        });
    }

    let valid = validated.offers.len();
    let unique = deduplicate(validated.offers);
    let duplicates = valid - unique.len();
    if duplicates > 0 {
        info!("deduplication removed {duplicates} offers");
    }

    let offers = sort_by_recency(unique);
    if let (Some(newest), Some(oldest)) = (offers.first(), offers.last()) {
        info!(
            "loaded {} offers ({} .. {})",
            offers.len(),
            oldest.creation_date,
            newest.creation_date
        );
    }

    let report = LoadReport {
        received: entries.len(),
        rejected: validated.rejected.len(),
        duplicates,
        loaded: offers.len(),
    };
    Ok(MasterSet { offers, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::sample_offer;
    use serde_json::json;

    fn dated(id: i64, date: &str) -> Offer {
        let mut o = sample_offer(id, "Acme", 10.0 + id as f64, 2.0);
        o.creation_date = date.to_string();
        o
    }

    fn ids(offers: &[Offer]) -> Vec<String> {
        offers.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let a = sample_offer(1, "Acme", 25.0, 2.0);
        let mut b = a.clone();
        b.id = crate::offer::OfferId::from(2);
        b.base = 1.0;
        let c = sample_offer(3, "acme", 25.0, 2.0);
        let out = deduplicate(vec![a, b, c]);
        assert_eq!(ids(&out), vec!["1", "3"]);
    }

    #[test]
    fn dedup_distinguishes_each_key_field() {
        let base = sample_offer(1, "Acme", 25.0, 2.0);
        let mut variants = vec![base.clone()];
        let mut v = base.clone();
        v.role = "SDE 2".into();
        variants.push(v);
        let mut v = base.clone();
        v.location = "Pune".into();
        variants.push(v);
        let mut v = base.clone();
        v.yoe = 3.0;
        variants.push(v);
        let mut v = base.clone();
        v.total = 26.0;
        variants.push(v);
        let mut v = base;
        v.creation_date = "2024-01-02".into();
        variants.push(v);
        assert_eq!(deduplicate(variants).len(), 6);
    }

    #[test]
    fn sorts_newest_first() {
        let out = sort_by_recency(vec![
            dated(1, "2023-05-01"),
            dated(2, "2024-02-01"),
            dated(3, "2023-12-31T10:00:00Z"),
        ]);
        assert_eq!(ids(&out), vec!["2", "3", "1"]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let out = sort_by_recency(vec![
            dated(1, "2024-01-01"),
            dated(2, "2024-01-01"),
            dated(3, "2024-01-01"),
        ]);
        assert_eq!(ids(&out), vec!["1", "2", "3"]);
    }

    #[test]
    fn unparsable_dates_do_not_panic() {
        let out = sort_by_recency(vec![
            dated(1, "garbage"),
            dated(2, "2022-01-01"),
            dated(3, "2024-01-01"),
            dated(4, "not a date"),
        ]);
        assert_eq!(out.len(), 4);
        let p2 = out.iter().position(|o| o.id.as_str() == "2").unwrap();
        let p3 = out.iter().position(|o| o.id.as_str() == "3").unwrap();
        assert!(p3 < p2);
    }

    #[test]
    fn build_rejects_non_arrays_and_empty_payloads() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            build_master_set(&json!({"offers": []}), &policy).unwrap_err(),
            BuildFailure::NotAnArray
        );
        assert_eq!(
            build_master_set(&json!([]), &policy).unwrap_err(),
            BuildFailure::Empty
        );
        assert_eq!(
            build_master_set(&json!([1, "x", null]), &policy).unwrap_err(),
            BuildFailure::NoValidOffers { received: 3 }
        );
    }
}
