use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};

use crate::models::{AdWeekRow, CohortSummary, CohortTotals};

/// Wall-clock date used for eligibility when no explicit date is injected.
pub fn evaluation_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Date at which week `offset` of a cohort closes: launch Monday plus
/// `7 * offset` days, plain UTC calendar arithmetic.
pub fn week_boundary(cohort_week: NaiveDate, offset: u8) -> NaiveDate {
    cohort_week + Duration::days(7 * i64::from(offset))
}

/// Group filtered rows into launch cohorts and compute each cohort's
/// cumulative hit-rate grid as of `as_of`. Rows without a cohort week are
/// skipped. Cohorts come back most recent first.
pub fn summarize_cohorts(rows: &[AdWeekRow], as_of: NaiveDate) -> Vec<CohortSummary> {
    let mut by_cohort: HashMap<NaiveDate, Vec<&AdWeekRow>> = HashMap::new();
    for row in rows {
        if let Some(week) = row.cohort_week {
            by_cohort.entry(week).or_default().push(row);
        }
    }

    let mut summaries: Vec<CohortSummary> = by_cohort
        .into_iter()
        .map(|(cohort_week, group)| summarize_group(cohort_week, &group, as_of))
        .collect();

    summaries.sort_by(|a, b| b.cohort_week.cmp(&a.cohort_week));
    summaries
}

fn summarize_group(
    cohort_week: NaiveDate,
    group: &[&AdWeekRow],
    as_of: NaiveDate,
) -> CohortSummary {
    let distinct_ads: HashSet<&str> = group.iter().map(|row| row.ad_id.as_str()).collect();
    let total_assets = distinct_ads.len().max(1);

    // Each offset's boundary is checked on its own; later weeks are never
    // assumed ineligible from an earlier one.
    let eligible: [bool; 4] =
        [1u8, 2, 3, 4].map(|offset| week_boundary(cohort_week, offset) <= as_of);

    // Carry the cumulative hit set forward across offsets: an ad hit at
    // offset k stays counted at every later offset even when its later
    // rows are missing. A missing row never reverts a hit.
    let mut hit_set: HashSet<&str> = HashSet::new();
    let mut cumulative = [0usize; 4];
    for offset in 1..=4u8 {
        for row in group
            .iter()
            .filter(|row| row.week_offset == offset && row.is_hit())
        {
            hit_set.insert(row.ad_id.as_str());
        }
        cumulative[usize::from(offset) - 1] = hit_set.len();
    }

    // Ineligible weeks report 0, not the future count.
    let percentage = |index: usize| -> f64 {
        if eligible[index] {
            (cumulative[index] as f64 / total_assets as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        }
    };

    // Best current estimate: the cumulative count at the latest offset
    // that has actually closed.
    let hits = (0..4)
        .rev()
        .find(|&index| eligible[index])
        .map(|index| cumulative[index])
        .unwrap_or(0);

    CohortSummary {
        cohort_week,
        total_assets,
        hits,
        week1: percentage(0),
        week2: percentage(1),
        week3: percentage(2),
        week4: percentage(3),
    }
}

/// Reduce cohort summaries into population-wide figures. Asset counts and
/// hits are plain sums; each weekly percentage is weighted by cohort size
/// so small cohorts do not drown out large ones.
pub fn reduce_totals(summaries: &[CohortSummary]) -> CohortTotals {
    let total_assets: usize = summaries.iter().map(|s| s.total_assets).sum();
    if total_assets == 0 {
        return CohortTotals::default();
    }

    let weighted = |week: fn(&CohortSummary) -> f64| -> f64 {
        summaries
            .iter()
            .map(|s| week(s) * s.total_assets as f64)
            .sum::<f64>()
            / total_assets as f64
    };

    CohortTotals {
        total_assets,
        hits: summaries.iter().map(|s| s.hits).sum(),
        week1: weighted(|s| s.week1),
        week2: weighted(|s| s.week2),
        week3: weighted(|s| s.week3),
        week4: weighted(|s| s.week4),
    }
}
