//! Dashboard numbers computed from the two ticket tables.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{TIMESTAMP_FORMAT, Ticket};

/// How many issue categories `top_issues` keeps.
pub const TOP_ISSUES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenTicketAge {
    pub ticket_id: String,
    pub priority: String,
    pub assigned_team: String,
    pub hours_open: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Percent, one decimal.
    pub resolution_rate: f64,
    pub resolved_by_team: BTreeMap<String, usize>,
    pub resolved_by_priority: BTreeMap<String, usize>,
    pub top_issues: Vec<IssueCount>,
    pub avg_resolution_hours_by_team: BTreeMap<String, f64>,
    /// Resolved tickets keyed by the date they were opened.
    pub opened_per_date: BTreeMap<String, usize>,
    pub unresolved_by_priority: BTreeMap<String, usize>,
    pub unresolved_by_team: BTreeMap<String, usize>,
    /// Newest first.
    pub open_ticket_ages: Vec<OpenTicketAge>,
}

pub fn dashboard_overview(
    resolved: &[Ticket],
    unresolved: &[Ticket],
    now: NaiveDateTime,
) -> DashboardOverview {
    let total = resolved.len() + unresolved.len();
    let resolution_rate = if total == 0 {
        0.0
    } else {
        round1(resolved.len() as f64 / total as f64 * 100.0)
    };

    let mut issues: Vec<IssueCount> = count_by(resolved, |t| &t.issue_summary)
        .into_iter()
        .map(|(issue, count)| IssueCount { issue, count })
        .collect();
    // stable sort keeps alphabetical order among equal counts
    issues.sort_by(|a, b| b.count.cmp(&a.count));
    issues.truncate(TOP_ISSUES);

    let mut durations: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for t in resolved {
        let Some(end) = t.resolved_at.as_deref() else { continue };
        if let Some(h) = hours_between(&t.opened_at, end) {
            durations.entry(t.assigned_team.clone()).or_default().push(h);
        }
    }
    let avg_resolution_hours_by_team = durations
        .into_iter()
        .map(|(team, hs)| {
            let avg = hs.iter().sum::<f64>() / hs.len() as f64;
            (team, round1(avg))
        })
        .collect();

    let mut opened_per_date = BTreeMap::new();
    for t in resolved {
        if let Some(date) = parse(&t.opened_at).map(|dt| dt.date().to_string()) {
            *opened_per_date.entry(date).or_insert(0) += 1;
        }
    }

    let mut open_ticket_ages: Vec<(Option<NaiveDateTime>, OpenTicketAge)> = unresolved
        .iter()
        .map(|t| {
            let opened = parse(&t.opened_at);
            let hours_open = opened
                .map(|o| round1((now - o).num_seconds() as f64 / 3600.0))
                .unwrap_or(0.0);
            let age = OpenTicketAge {
                ticket_id: t.ticket_id.clone(),
                priority: t.priority.clone(),
                assigned_team: t.assigned_team.clone(),
                hours_open,
            };
            (opened, age)
        })
        .collect();
    open_ticket_ages.sort_by(|a, b| b.0.cmp(&a.0));

    DashboardOverview {
        total,
        resolved: resolved.len(),
        unresolved: unresolved.len(),
        resolution_rate,
        resolved_by_team: count_by(resolved, |t| &t.assigned_team),
        resolved_by_priority: count_by(resolved, |t| &t.priority),
        top_issues: issues,
        avg_resolution_hours_by_team,
        opened_per_date,
        unresolved_by_priority: count_by(unresolved, |t| &t.priority),
        unresolved_by_team: count_by(unresolved, |t| &t.assigned_team),
        open_ticket_ages: open_ticket_ages.into_iter().map(|(_, a)| a).collect(),
    }
}

fn count_by(tickets: &[Ticket], key: impl Fn(&Ticket) -> &String) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for t in tickets {
        *out.entry(key(t).clone()).or_insert(0) += 1;
    }
    out
}

fn parse(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

fn hours_between(start: &str, end: &str) -> Option<f64> {
    let (s, e) = (parse(start)?, parse(end)?);
    Some((e - s).num_seconds() as f64 / 3600.0)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
