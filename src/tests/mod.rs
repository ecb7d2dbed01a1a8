use std::collections::HashSet;

use serde_json::{json, Value};

use crate::filter::FilterState;
use crate::offer::{OfferId, ValidationPolicy};
use crate::pipeline::build_master_set;
use crate::runner::{Dashboard, DataSource, Options};

fn acme(id: i64) -> Value {
    json!({
        "id": id,
        "company": "Acme",
        "role": "SWE",
        "mapped_role": "Software Engineer",
        "location": "Bangalore",
        "yoe": 2,
        "total": 25,
        "base": 20,
        "mapped_yoe": "Mid (2-6)",
        "creation_date": "2024-01-01",
        "interview_exp": "N/A"
    })
}

fn mixed_payload() -> Value {
    let companies = ["Google", "Amazon", "Flipkart", "Microsoft", "Swiggy"];
    let locations = ["Bangalore", "Hyderabad", "Pune"];
    let mut out: Vec<Value> = (0..40)
        .map(|i| {
            json!({
                "id": i,
                "company": companies[i % companies.len()],
                "role": if i % 3 == 0 { "SDE 2 (Java)" } else { "Data Engineer" },
                "mapped_role": if i % 3 == 0 { "Software Engineer" } else { "Data Engineer" },
                "location": locations[i % locations.len()],
                "yoe": (i % 12) as f64 + 0.5,
                "total": 5.0 + (i * 7 % 230) as f64,
                "base": 4,
                "creation_date": format!("2023-{:02}-{:02}", 1 + i % 12, 1 + i % 27),
                "interview_exp": if i % 4 == 0 { "https://leetcode.com/discuss/x" } else { "N/A" }
            })
        })
        .collect();
    // an exact duplicate, an unparsable date and a broken entry
    out.push(out[5].clone());
    out.push(json!({
        "id": 900, "company": "Zoho", "role": "SDE", "mapped_role": "Software Engineer",
        "location": "Chennai", "yoe": 1, "total": 12, "creation_date": "sometime"
    }));
    out.push(json!({"id": 901, "company": "Broken"}));
    Value::Array(out)
}

#[test]
fn end_to_end_duplicate_and_missing_total() {
    let mut third = acme(3);
    third.as_object_mut().unwrap().remove("total");
    let raw = json!([acme(1), acme(2), third]);

    let master = build_master_set(&raw, &ValidationPolicy::default()).unwrap();
    assert_eq!(master.offers.len(), 1);
    assert_eq!(master.offers[0].id, OfferId::from(1));
    assert_eq!(master.report.rejected, 1);
    assert_eq!(master.report.duplicates, 1);

    let stats = crate::stats::summary_stats(&master.offers);
    assert_eq!(stats.count, 1);
    assert_eq!(stats.avg_total, 25.0);
    assert_eq!(stats.distinct_companies, 1);
}

#[test]
fn pipeline_is_idempotent() {
    let raw = mixed_payload();
    let a = build_master_set(&raw, &ValidationPolicy::default()).unwrap();
    let b = build_master_set(&raw, &ValidationPolicy::default()).unwrap();
    assert_eq!(a.offers, b.offers);
    assert_eq!(a.report, b.report);
}

#[test]
fn dedup_keys_are_unique_in_master() {
    let master = build_master_set(&mixed_payload(), &ValidationPolicy::default()).unwrap();
    let keys: HashSet<_> = master
        .offers
        .iter()
        .map(crate::pipeline::DedupKey::of)
        .collect();
    assert_eq!(keys.len(), master.offers.len());
    assert_eq!(master.report.duplicates, 1);
    assert_eq!(master.report.rejected, 1);
    assert!(master.offers.iter().any(|o| o.id == OfferId::from(5)));
}

#[test]
fn adjacent_parsable_dates_are_non_increasing() {
    let master = build_master_set(&mixed_payload(), &ValidationPolicy::default()).unwrap();
    let dates: Vec<_> = master
        .offers
        .iter()
        .map(|o| crate::utils::parse_date(&o.creation_date))
        .collect();
    assert!(dates.iter().any(Option::is_none));
    for pair in dates.windows(2) {
        if let (Some(a), Some(b)) = (pair[0], pair[1]) {
            assert!(a >= b);
        }
    }
}

#[test]
fn default_filter_returns_master_unchanged() {
    let master = build_master_set(&mixed_payload(), &ValidationPolicy::default()).unwrap();
    let filtered = FilterState::default().apply(&master.offers);
    assert_eq!(filtered, master.offers);
}

#[test]
fn extra_predicates_never_grow_the_result() {
    let master = build_master_set(&mixed_payload(), &ValidationPolicy::default()).unwrap();
    let base = FilterState {
        location: "bangalore".into(),
        ..FilterState::default()
    };
    let base_len = base.apply(&master.offers).len();
    let narrower = [
        FilterState {
            company: "goo".into(),
            ..base.clone()
        },
        FilterState {
            search: "java".into(),
            ..base.clone()
        },
        FilterState {
            yoe_min: 3.0,
            ..base.clone()
        },
        FilterState {
            salary_max: 100.0,
            ..base.clone()
        },
        FilterState {
            include_interview_exp: true,
            ..base.clone()
        },
    ];
    for state in narrower {
        assert!(state.apply(&master.offers).len() <= base_len, "{state:?}");
    }
}

#[test]
fn percentile_of_equal_values() {
    let values = [7.5, 7.5, 7.5];
    for p in [0.0, 50.0, 100.0] {
        assert_eq!(crate::stats::percentile(&values, p), Some(7.5));
    }
}

#[test]
fn dashboard_pages_through_twenty_five() {
    let raw = Value::Array(
        (0..25)
            .map(|i| {
                json!({
                    "id": i, "company": format!("C{i}"), "role": "SDE",
                    "mapped_role": "Software Engineer", "location": "Pune", "yoe": 1,
                    "total": 10, "creation_date": format!("2024-01-{:02}", 25 - i)
                })
            })
            .collect(),
    );
    let mut d = Dashboard::from_raw(&raw, &Options::default()).unwrap();
    let first = d.page();
    assert_eq!((first.start_index, first.end_index), (1, 10));
    assert_eq!(first.items[0].id, OfferId::from(0));

    let third = d.go_to_page(3);
    assert_eq!((third.start_index, third.end_index), (21, 25));
    assert!(!third.has_next);

    let clamped = d.go_to_page(4);
    assert_eq!(clamped.page, 3);
    let still = d.next_page();
    assert_eq!(still.page, 3);

    d.set_page_size(20).unwrap();
    assert_eq!(d.page().page, 1);
    assert!(d.set_page_size(0).is_err());
}

#[test]
fn comparison_capacity_through_dashboard() {
    let mut d = Dashboard::from_raw(&mixed_payload(), &Options::default()).unwrap();
    for id in 0..5 {
        assert_eq!(
            d.toggle_comparison(&OfferId::from(id)),
            Some(crate::compare::ToggleOutcome::Added)
        );
    }
    assert_eq!(
        d.toggle_comparison(&OfferId::from(6)),
        Some(crate::compare::ToggleOutcome::CapacityReached)
    );
    assert_eq!(d.comparison().len(), 5);
    assert!(d.comparison().metrics().is_some());
    assert!(d.remove_from_comparison(&OfferId::from(0)));
    d.clear_comparison();
    assert!(d.comparison().export(chrono::Utc::now()).is_none());
}

#[test]
fn filtering_keeps_comparison() {
    let mut d = Dashboard::from_raw(&mixed_payload(), &Options::default()).unwrap();
    d.toggle_comparison(&OfferId::from(1));
    d.apply_filters(FilterState {
        company: "does-not-exist".into(),
        ..FilterState::default()
    })
    .unwrap();
    assert!(d.filtered().is_empty());
    assert_eq!(d.summary().count, 0);
    assert!(d.charts().is_empty());
    assert_eq!(d.page().total_pages, 1);
    assert_eq!(d.comparison().len(), 1);
}

#[test]
fn zero_yoe_depends_on_policy() {
    let mut fresher = acme(1);
    fresher["yoe"] = json!(0);
    let raw = json!([fresher]);

    let strict = Options::default();
    assert!(Dashboard::from_raw(&raw, &strict).is_err());

    let numeric = Options {
        validation: ValidationPolicy {
            yoe: crate::offer::YoePolicy::Numeric,
            ..ValidationPolicy::default()
        },
        ..Options::default()
    };
    let d = Dashboard::from_raw(&raw, &numeric).unwrap();
    assert_eq!(d.master()[0].yoe, 0.0);
}

#[tokio::test]
async fn loads_dashboard_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comps.json");
    tokio::fs::write(&path, serde_json::to_vec(&mixed_payload()).unwrap())
        .await
        .unwrap();

    let options = Options {
        source: DataSource::FilePath(path.to_string_lossy().to_string()),
        ..Options::default()
    };
    let d = Dashboard::load(&options).await.unwrap();
    assert_eq!(d.report().received, 43);
    assert_eq!(d.report().loaded, d.master().len());
}

#[tokio::test]
async fn malformed_json_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comps.json");
    tokio::fs::write(&path, b"[{\"id\": 1,").await.unwrap();
    let options = Options {
        source: DataSource::FilePath(path.to_string_lossy().to_string()),
        ..Options::default()
    };
    let err = Dashboard::load(&options).await.unwrap_err();
    assert!(matches!(
        err,
        crate::runner::RunnerError::Load(crate::runner::LoadError::Parse { .. })
    ));
}

fn count_matching(master: &[crate::offer::Offer], query: &str) -> usize {
    FilterState {
        search: query.to_string(),
        ..FilterState::default()
    }
    .apply(master)
    .len()
}

#[tokio::test]
async fn debounced_search_applies_latest_query() {
    let debouncer = crate::debounce::Debouncer::new(std::time::Duration::from_millis(20));
    let master = build_master_set(&mixed_payload(), &ValidationPolicy::default())
        .unwrap()
        .offers;
    let early = debouncer.run(|| count_matching(&master, "goo"));
    let late = async {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        debouncer.run(|| count_matching(&master, "google")).await
    };
    let (a, b) = tokio::join!(early, late);
    assert_eq!(a, None);
    assert_eq!(b, Some(8));
}
