use std::fmt::Write;

use crate::models::{CohortSummary, CohortTotals};

/// Render the cohort grid and its population summary as markdown.
pub fn build_report(
    selection: &str,
    generated_at: &str,
    summaries: &[CohortSummary],
    totals: &CohortTotals,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Ad Cohort Hit Rates");
    let _ = writeln!(output, "Selection: {selection}");
    if !generated_at.is_empty() {
        let _ = writeln!(output, "Source data generated at {generated_at}");
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    if summaries.is_empty() {
        let _ = writeln!(output, "No cohort rows for this selection.");
        return output;
    }

    let _ = writeln!(output, "- Total assets: {}", totals.total_assets);
    let _ = writeln!(
        output,
        "- Hits at latest eligible week: {}",
        totals.hits
    );
    let _ = writeln!(
        output,
        "- Asset-weighted hit rate: week 1 {:.1}%, week 2 {:.1}%, week 3 {:.1}%, week 4 {:.1}%",
        totals.week1, totals.week2, totals.week3, totals.week4
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cohorts");
    let _ = writeln!(
        output,
        "Weekly targets: week 1 >= 10%, week 2 >= 20%, weeks 3-4 >= 25%."
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "| Cohort Week (Mon) | Assets | Hits | Week 1 (+7d) | Week 2 (+14d) | Week 3 (+21d) | Week 4 (+28d) |"
    );
    let _ = writeln!(
        output,
        "|---|---|---|---|---|---|---|"
    );

    for summary in summaries {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {:.1}% | {:.1}% | {:.1}% | {:.1}% |",
            summary.cohort_week,
            summary.total_assets,
            summary.hits,
            summary.week1,
            summary.week2,
            summary.week3,
            summary.week4
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_selection_reports_fallback_line() {
        let report = build_report("all rows", "", &[], &CohortTotals::default());
        assert!(report.contains("No cohort rows for this selection."));
        assert!(!report.contains("| Cohort Week"));
    }

    #[test]
    fn cohort_rows_render_with_one_decimal() {
        let summaries = vec![CohortSummary {
            cohort_week: NaiveDate::from_ymd_opt(2026, 7, 6).unwrap(),
            total_assets: 3,
            hits: 1,
            week1: 33.3,
            week2: 33.3,
            week3: 33.3,
            week4: 33.3,
        }];
        let totals = crate::cohort::reduce_totals(&summaries);

        let report = build_report("campaign = Summer", "2026-08-01T00:00:00Z", &summaries, &totals);
        assert!(report.contains("Selection: campaign = Summer"));
        assert!(report.contains("Source data generated at 2026-08-01T00:00:00Z"));
        assert!(report.contains("| 2026-07-06 | 3 | 1 | 33.3% | 33.3% | 33.3% | 33.3% |"));
        assert!(report.contains("- Total assets: 3"));
    }
}
