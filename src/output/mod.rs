use colored::Colorize;
use serde::Serialize;

use crate::compare::ComparisonMetrics;
use crate::filter::FilterState;
use crate::interviews;
use crate::offer::Offer;
use crate::pipeline::LoadReport;
use crate::runner::Dashboard;
use crate::stats::{ChartSeries, SummaryStats};
use crate::suggest::{self, SuggestField};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub offers: Vec<Offer>,
    pub metrics: Option<ComparisonMetrics>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuggestionReport {
    pub field: String,
    pub query: String,
    pub values: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InterviewEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub yoe: f64,
    pub total: f64,
    pub link: String,
    pub tech: Vec<String>,
}

/// Everything one dashboard render needs, detached from the live state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub load: LoadReport,
    pub filters: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_filters: Option<String>,
    pub summary: SummaryStats,
    pub charts: ChartSeries,
    pub page: PageInfo,
    pub offers: Vec<Offer>,
    pub comparison: ComparisonReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<SuggestionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviews: Option<Vec<InterviewEntry>>,
}

impl DashboardReport {
    pub fn build(dashboard: &Dashboard, source: &str) -> Self {
        let page = dashboard.page();
        Self {
            source: source.to_string(),
            last_updated: None,
            load: dashboard.report().clone(),
            filters: dashboard.filters().clone(),
            active_filters: dashboard.filters().summary(),
            summary: dashboard.summary(),
            charts: dashboard.charts(),
            page: PageInfo {
                page: page.page,
                page_size: page.page_size,
                total_items: page.total_items,
                total_pages: page.total_pages,
                start_index: page.start_index,
                end_index: page.end_index,
                has_prev: page.has_prev,
                has_next: page.has_next,
            },
            offers: page.items.to_vec(),
            comparison: ComparisonReport {
                offers: dashboard.comparison().members().to_vec(),
                metrics: dashboard.comparison().metrics(),
            },
            suggestions: None,
            interviews: None,
        }
    }

    pub fn with_last_updated(mut self, label: String) -> Self {
        self.last_updated = Some(label);
        self
    }

    pub fn with_suggestions(mut self, dashboard: &Dashboard, field: SuggestField, query: &str) -> Self {
        let corpus = field.corpus(dashboard.master());
        self.suggestions = Some(SuggestionReport {
            field: field.as_str().to_string(),
            query: query.to_string(),
            values: suggest::suggest(&corpus, query),
        });
        self
    }

    pub fn with_interviews(mut self, dashboard: &Dashboard, limit: usize) -> Self {
        let entries = interviews::interview_offers(dashboard.master(), limit)
            .into_iter()
            .map(|o| InterviewEntry {
                id: o.id.to_string(),
                company: o.company.clone(),
                role: o.mapped_role.clone(),
                location: o.location.clone(),
                yoe: o.yoe,
                total: o.total,
                link: o.interview_exp.clone(),
                tech: interviews::tech_tags(o).into_iter().map(str::to_string).collect(),
            })
            .collect();
        self.interviews = Some(entries);
        self
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&format!(":: {} ::\n", title.bold().white()));
}

fn kv(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<10}: {}\n", label, value));
}

fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let len = ((count * width) / max).max(1);
    "#".repeat(len)
}

fn render_offer_rows(out: &mut String, offers: &[Offer]) {
    out.push_str(&format!(
        "  {:<8} {:<20} {:<24} {:<14} {:>5} {:>8} {:>8}  {}\n",
        "id", "company", "role", "location", "yoe", "total", "base", "date"
    ));
    for o in offers {
        let interview = if o.has_interview_experience() {
            " *".cyan().to_string()
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<8} {:<20} {:<24} {:<14} {:>5} {:>8} {:>8}  {}{}\n",
            clip(o.id.as_str(), 8),
            clip(&o.company, 20).bold().blue(),
            clip(&o.mapped_role, 24),
            clip(&o.location, 14),
            o.yoe,
            format!("{:.1}", o.total).green(),
            format!("{:.1}", o.base),
            o.creation_date,
            interview,
        ));
    }
}

pub fn render_text(report: &DashboardReport) -> Vec<u8> {
    let mut out = String::new();
    kv(&mut out, "Source", &report.source);
    if let Some(updated) = report.last_updated.as_deref() {
        kv(&mut out, "Updated", updated);
    }
    kv(
        &mut out,
        "Loaded",
        &format!(
            "received={} rejected={} duplicates={} offers={}",
            report.load.received, report.load.rejected, report.load.duplicates, report.load.loaded
        ),
    );
    kv(
        &mut out,
        "Filters",
        report.active_filters.as_deref().unwrap_or("none"),
    );

    heading(&mut out, "Summary");
    kv(&mut out, "Offers", &report.summary.count.to_string());
    kv(
        &mut out,
        "Average",
        &format!("{:.1} LPA", report.summary.avg_total),
    );
    kv(
        &mut out,
        "Companies",
        &report.summary.distinct_companies.to_string(),
    );

    if report.summary.count == 0 {
        out.push_str(&format!("\n{}\n", "No offers match the current filters".yellow()));
    } else {
        heading(&mut out, "Salary distribution (LPA)");
        let max = report
            .charts
            .salary_histogram
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);
        for b in &report.charts.salary_histogram {
            out.push_str(&format!(
                "  {:>8} {:>6} {}\n",
                b.label,
                b.count,
                bar(b.count, max, 40).green()
            ));
        }

        heading(&mut out, "Experience levels");
        for e in &report.charts.experience_distribution {
            out.push_str(&format!("  {:<16} {:>6}\n", e.label, e.count));
        }

        heading(&mut out, "Top companies");
        for c in &report.charts.top_companies {
            out.push_str(&format!("  {:<24} {:>6}\n", clip(&c.label, 24), c.count));
        }

        if !report.charts.company_spread.is_empty() {
            heading(&mut out, "Salary spread by company (min/q1/median/q3/max)");
            for s in &report.charts.company_spread {
                let [min, q1, median, q3, max] = s.five_numbers();
                out.push_str(&format!(
                    "  {:<24} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1}  (n={})\n",
                    clip(&s.company, 24),
                    min,
                    q1,
                    median,
                    q3,
                    max,
                    s.count
                ));
            }
        }

        heading(
            &mut out,
            &format!(
                "Offers {}-{} of {} (page {}/{})",
                report.page.start_index,
                report.page.end_index,
                report.page.total_items,
                report.page.page,
                report.page.total_pages
            ),
        );
        render_offer_rows(&mut out, &report.offers);
    }

    if !report.comparison.offers.is_empty() {
        heading(&mut out, "Comparison");
        render_offer_rows(&mut out, &report.comparison.offers);
        match report.comparison.metrics.as_ref() {
            Some(m) => {
                kv(&mut out, "Average", &format!("{:.1} LPA", m.avg_total));
                kv(&mut out, "Difference", &format!("{:.1} LPA", m.spread));
                kv(&mut out, "Avg yoe", &format!("{:.1}", m.avg_yoe));
            }
            None => out.push_str("  add another offer to see comparison metrics\n"),
        }
    }

    if let Some(s) = report.suggestions.as_ref() {
        heading(&mut out, &format!("Suggestions for {} '{}'", s.field, s.query));
        if s.values.is_empty() {
            out.push_str("  (none)\n");
        }
        for v in &s.values {
            out.push_str(&format!("  {v}\n"));
        }
    }

    if let Some(entries) = report.interviews.as_ref() {
        heading(&mut out, "Interview experiences");
        for e in entries {
            out.push_str(&format!(
                "  {} {} ({}, {} yoe, {:.1} LPA) [{}]\n    {}\n",
                e.company.bold().blue(),
                e.role,
                e.location,
                e.yoe,
                e.total,
                e.tech.join(", "),
                e.link
            ));
        }
    }

    out.into_bytes()
}

pub fn render_json(report: &DashboardReport) -> Result<Vec<u8>, String> {
    serde_json::to_vec_pretty(report).map_err(|e| format!("failed to serialize report: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Options;
    use serde_json::json;

    fn dashboard() -> Dashboard {
        let raw = json!([
            {"id": 1, "company": "Acme", "role": "SDE 2", "mapped_role": "Software Engineer",
             "location": "Pune", "yoe": 3, "total": 40, "base": 30,
             "creation_date": "2024-02-01", "interview_exp": "https://leetcode.com/discuss/1"},
            {"id": 2, "company": "Globex", "role": "Java Dev", "mapped_role": "Backend Engineer",
             "location": "Bangalore", "yoe": 6, "total": 60, "base": 45,
             "creation_date": "2024-03-01"}
        ]);
        Dashboard::from_raw(&raw, &Options::default()).unwrap()
    }

    #[test]
    fn format_parse_and_infer() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out.json"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("out"), None);
    }

    #[test]
    fn report_json_carries_page_and_summary() {
        let report = DashboardReport::build(&dashboard(), "inline");
        let v: serde_json::Value = serde_json::from_slice(&render_json(&report).unwrap()).unwrap();
        assert_eq!(v["summary"]["count"], 2);
        assert_eq!(v["summary"]["avg_total"], 50.0);
        assert_eq!(v["page"]["total_pages"], 1);
        assert_eq!(v["offers"][0]["id"], "2");
        assert!(v.get("suggestions").is_none());
        assert!(v["comparison"]["metrics"].is_null());
    }

    #[test]
    fn lookups_are_attached_on_request() {
        let d = dashboard();
        let report = DashboardReport::build(&d, "inline")
            .with_suggestions(&d, SuggestField::Company, "glo")
            .with_interviews(&d, 20)
            .with_last_updated("3d ago".to_string());
        assert_eq!(report.suggestions.as_ref().unwrap().values, vec!["Globex"]);
        let interviews = report.interviews.as_ref().unwrap();
        assert_eq!(interviews.len(), 1);
        assert_eq!(interviews[0].company, "Acme");
        assert_eq!(report.last_updated.as_deref(), Some("3d ago"));
    }

    #[test]
    fn text_report_mentions_offers() {
        colored::control::set_override(false);
        let report = DashboardReport::build(&dashboard(), "inline");
        let text = String::from_utf8(render_text(&report)).unwrap();
        assert!(text.contains("Globex"));
        assert!(text.contains("Offers 1-2 of 2 (page 1/1)"));
        assert!(!text.contains("Comparison"));
    }

    #[test]
    fn clip_marks_truncation() {
        assert_eq!(clip("abcdef", 4), "abc~");
        assert_eq!(clip("abc", 4), "abc");
    }
}
