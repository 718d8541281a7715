//! Dashboard reports derived from analytics counters and leads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::leads::{ContactSubmission, LeadStatus};

/// Views recorded for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewCount {
    pub path: String,
    pub views: u64,
}

/// Clicks recorded for one button on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickCount {
    pub button: String,
    pub page: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewRow {
    pub path: String,
    pub views: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewReport {
    pub total: u64,
    pub pages: Vec<PageViewRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickRow {
    pub button: String,
    pub page: String,
    pub clicks: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickReport {
    pub total: u64,
    pub buttons: Vec<ButtonClickRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub sent_to_hubspot: usize,
    pub conversion_rate: f64,
}

/// `part / total` as a percentage rounded to one decimal; 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

pub fn page_view_report(counts: &[PageViewCount]) -> PageViewReport {
    let total = counts.iter().map(|c| c.views).sum();
    let mut pages: Vec<PageViewRow> = counts
        .iter()
        .map(|c| PageViewRow {
            path: c.path.clone(),
            views: c.views,
            percentage: percentage(c.views, total),
        })
        .collect();
    pages.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.path.cmp(&b.path)));
    PageViewReport { total, pages }
}

pub fn button_click_report(counts: &[ButtonClickCount]) -> ButtonClickReport {
    let total = counts.iter().map(|c| c.clicks).sum();
    let mut buttons: Vec<ButtonClickRow> = counts
        .iter()
        .map(|c| ButtonClickRow {
            button: c.button.clone(),
            page: c.page.clone(),
            clicks: c.clicks,
            percentage: percentage(c.clicks, total),
        })
        .collect();
    buttons.sort_by(|a, b| {
        b.clicks
            .cmp(&a.clicks)
            .then_with(|| a.button.cmp(&b.button))
            .then_with(|| a.page.cmp(&b.page))
    });
    ButtonClickReport { total, buttons }
}

pub fn lead_summary(leads: &[ContactSubmission]) -> LeadSummary {
    let mut by_status: BTreeMap<String, usize> =
        LeadStatus::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect();
    for lead in leads {
        *by_status.entry(lead.status.as_str().to_string()).or_default() += 1;
    }
    let converted = leads.iter().filter(|l| l.status == LeadStatus::Converted).count();
    LeadSummary {
        total: leads.len(),
        by_status,
        sent_to_hubspot: leads.iter().filter(|l| l.sent_to_hubspot).count(),
        conversion_rate: percentage(converted as u64, leads.len() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::leads::NewContactSubmission;
    use chrono::Utc;

    fn views(path: &str, views: u64) -> PageViewCount {
        PageViewCount {
            path: path.into(),
            views,
        }
    }

    #[test]
    fn page_views_sorted_with_percentages() {
        let report = page_view_report(&[views("/blog", 1), views("/", 2), views("/about", 2)]);
        assert_eq!(report.total, 5);
        let rows: Vec<(&str, f64)> = report.pages.iter().map(|r| (r.path.as_str(), r.percentage)).collect();
        assert_eq!(rows, [("/", 40.0), ("/about", 40.0), ("/blog", 20.0)]);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn button_clicks_report() {
        let report = button_click_report(&[
            ButtonClickCount {
                button: "cta-demo".into(),
                page: "/".into(),
                clicks: 3,
            },
            ButtonClickCount {
                button: "cta-contact".into(),
                page: "/clients".into(),
                clicks: 1,
            },
        ]);
        assert_eq!(report.total, 4);
        assert_eq!(report.buttons[0].button, "cta-demo");
        assert_eq!(report.buttons[0].percentage, 75.0);
    }

    #[test]
    fn empty_reports() {
        assert_eq!(page_view_report(&[]).total, 0);
        let summary = lead_summary(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.conversion_rate, 0.0);
        assert_eq!(summary.by_status.len(), 5);
    }

    #[test]
    fn lead_summary_counts() {
        let now = Utc::now();
        let mut leads: Vec<ContactSubmission> = (0..4)
            .map(|i| {
                NewContactSubmission {
                    name: format!("Lead {i}"),
                    email: format!("lead{i}@example.com"),
                    message: "Hello".into(),
                    ..NewContactSubmission::default()
                }
                .into_submission(now)
            })
            .collect();
        leads[0].status = LeadStatus::Converted;
        leads[1].status = LeadStatus::Contacted;
        leads[1].sent_to_hubspot = true;

        let summary = lead_summary(&leads);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_status["new"], 2);
        assert_eq!(summary.by_status["converted"], 1);
        assert_eq!(summary.sent_to_hubspot, 1);
        assert_eq!(summary.conversion_rate, 25.0);
    }
}
