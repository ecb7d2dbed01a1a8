//! Drives the dashboard as a library: load an inline payload, filter, page
//! through the result and compare two offers.
//!
//! cargo run --example library_dashboard

use compboard::filter::FilterState;
use compboard::offer::OfferId;
use compboard::output::{self, DashboardReport};
use compboard::runner::{Dashboard, DataSource, Options, RunnerError};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), RunnerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let payload = json!([
        {"id": 1, "company": "Google", "role": "L4", "mapped_role": "Software Engineer",
         "location": "Bangalore", "yoe": 4, "total": 62, "base": 38, "mapped_yoe": "Mid (2-6)",
         "creation_date": "2024-03-02", "interview_exp": "https://leetcode.com/discuss/1"},
        {"id": 2, "company": "Flipkart", "role": "SDE 2", "mapped_role": "Software Engineer",
         "location": "Bangalore", "yoe": 3, "total": 41, "base": 30, "mapped_yoe": "Mid (2-6)",
         "creation_date": "2024-02-18"},
        {"id": 3, "company": "Swiggy", "role": "Data Scientist", "mapped_role": "Data Scientist",
         "location": "Hyderabad", "yoe": 8, "total": 70, "base": 55, "mapped_yoe": "Senior (7-10)",
         "creation_date": "2024-01-09"},
        {"id": 4, "company": "Flipkart", "role": "SDE 2", "mapped_role": "Software Engineer",
         "location": "Bangalore", "yoe": 3, "total": 41, "base": 30,
         "creation_date": "2024-02-18"}
    ]);

    let options = Options {
        source: DataSource::Inline(payload),
        page_size: 2,
        ..Options::default()
    };
    let mut dashboard = Dashboard::load(&options).await?;

    dashboard.apply_filters(FilterState {
        location: "bangalore".into(),
        ..FilterState::default()
    })?;
    dashboard.toggle_comparison(&OfferId::from(1));
    dashboard.toggle_comparison(&OfferId::from(2));

    let report = DashboardReport::build(&dashboard, "inline");
    print!("{}", String::from_utf8_lossy(&output::render_text(&report)));

    if let Some(export) = dashboard.comparison().export(chrono::Utc::now()) {
        match export.to_json_pretty() {
            Ok(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}
