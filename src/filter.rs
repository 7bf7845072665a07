use std::collections::BTreeSet;

use crate::models::AdWeekRow;

/// Sentinel meaning "no filter" for a dimension, as supplied by the
/// presentation layer.
pub const ALL: &str = "All";

/// Active filter values, one per dimension. `campaign` and `ad` match a
/// field exactly; the remaining dimensions are tags embedded in the ad
/// name and match by containment.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub campaign: String,
    pub ad: String,
    pub editor: String,
    pub angle: String,
    pub strategist: String,
    pub ad_type: String,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            campaign: ALL.to_string(),
            ad: ALL.to_string(),
            editor: ALL.to_string(),
            angle: ALL.to_string(),
            strategist: ALL.to_string(),
            ad_type: ALL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    CampaignName,
    AdName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
}

/// One active predicate: which field it reads and how it matches.
/// Rules are built once per filter set, never resolved per row.
#[derive(Debug, Clone)]
pub struct FilterRule {
    pub field: FilterField,
    pub mode: MatchMode,
    pub value: String,
}

impl FilterRule {
    fn matches(&self, row: &AdWeekRow) -> bool {
        let text = match self.field {
            FilterField::CampaignName => row.campaign_name_at_launch.as_str(),
            FilterField::AdName => row.ad_name_at_launch.as_str(),
        };
        match self.mode {
            MatchMode::Exact => text == self.value,
            MatchMode::Contains => text.contains(&self.value),
        }
    }
}

impl FilterSet {
    /// Compile the non-sentinel dimensions into predicate rules. Every
    /// dimension is a real predicate; there is no pass-through category.
    pub fn rules(&self) -> Vec<FilterRule> {
        let dimensions = [
            (&self.campaign, FilterField::CampaignName, MatchMode::Exact),
            (&self.ad, FilterField::AdName, MatchMode::Exact),
            (&self.editor, FilterField::AdName, MatchMode::Contains),
            (&self.angle, FilterField::AdName, MatchMode::Contains),
            (&self.strategist, FilterField::AdName, MatchMode::Contains),
            (&self.ad_type, FilterField::AdName, MatchMode::Contains),
        ];

        dimensions
            .into_iter()
            .filter(|(value, _, _)| value.as_str() != ALL)
            .map(|(value, field, mode)| FilterRule {
                field,
                mode,
                value: value.clone(),
            })
            .collect()
    }

    /// Human-readable summary of the active filters for report headers.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        for (label, value) in [
            ("campaign", &self.campaign),
            ("ad", &self.ad),
            ("editor", &self.editor),
            ("angle", &self.angle),
            ("strategist", &self.strategist),
            ("ad type", &self.ad_type),
        ] {
            if value != ALL {
                parts.push(format!("{label} = {value}"));
            }
        }
        if parts.is_empty() {
            "all rows".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Keep rows satisfying every active rule (logical AND). A pure per-row
/// predicate over the input; an empty selection is a valid result.
pub fn apply_filters(rows: &[AdWeekRow], filters: &FilterSet) -> Vec<AdWeekRow> {
    let rules = filters.rules();
    rows.iter()
        .filter(|row| rules.iter().all(|rule| rule.matches(row)))
        .cloned()
        .collect()
}

/// Distinct non-empty campaign names, `All` first then ascending.
pub fn campaign_options(rows: &[AdWeekRow]) -> Vec<String> {
    distinct_options(rows, |row| &row.campaign_name_at_launch)
}

/// Distinct non-empty ad names, `All` first then ascending.
pub fn ad_options(rows: &[AdWeekRow]) -> Vec<String> {
    distinct_options(rows, |row| &row.ad_name_at_launch)
}

fn distinct_options<F>(rows: &[AdWeekRow], field: F) -> Vec<String>
where
    F: Fn(&AdWeekRow) -> &String,
{
    let values: BTreeSet<&String> = rows
        .iter()
        .map(field)
        .filter(|value| !value.is_empty())
        .collect();

    let mut options = vec![ALL.to_string()];
    options.extend(values.into_iter().cloned());
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(campaign: &str, ad: &str) -> AdWeekRow {
        AdWeekRow {
            ad_id: format!("{campaign}/{ad}"),
            ad_name_at_launch: ad.to_string(),
            campaign_id: "cmp_1".to_string(),
            campaign_name_at_launch: campaign.to_string(),
            cohort_week: NaiveDate::from_ymd_opt(2026, 7, 6),
            week_offset: 1,
            hit_cum: 0,
            purchases: 0,
            revenue: 0.0,
            spend: 0.0,
        }
    }

    #[test]
    fn all_sentinel_passes_everything() {
        let rows = vec![row("Summer", "AD-1"), row("Winter", "AD-2")];
        let filtered = apply_filters(&rows, &FilterSet::default());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn exact_match_selects_single_campaign() {
        let rows = vec![row("Summer", "AD-1"), row("Winter", "AD-2")];
        let filters = FilterSet {
            campaign: "Summer".to_string(),
            ..FilterSet::default()
        };
        let filtered = apply_filters(&rows, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].campaign_name_at_launch, "Summer");
    }

    #[test]
    fn tag_filters_match_by_containment() {
        let rows = vec![
            row("Summer", "ED:kim|ANGLE:price|UGC"),
            row("Summer", "ED:lee|ANGLE:speed|STATIC"),
        ];
        let filters = FilterSet {
            editor: "ED:kim".to_string(),
            ..FilterSet::default()
        };
        let filtered = apply_filters(&rows, &filters);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].ad_name_at_launch.contains("ED:kim"));
    }

    #[test]
    fn conjunction_is_the_intersection_of_single_filters() {
        let rows = vec![
            row("Summer", "ED:kim|UGC"),
            row("Summer", "ED:lee|UGC"),
            row("Winter", "ED:kim|UGC"),
        ];

        let by_campaign = apply_filters(
            &rows,
            &FilterSet {
                campaign: "Summer".to_string(),
                ..FilterSet::default()
            },
        );
        let by_editor = apply_filters(
            &rows,
            &FilterSet {
                editor: "ED:kim".to_string(),
                ..FilterSet::default()
            },
        );
        let both = apply_filters(
            &rows,
            &FilterSet {
                campaign: "Summer".to_string(),
                editor: "ED:kim".to_string(),
                ..FilterSet::default()
            },
        );

        assert_eq!(by_campaign.len(), 2);
        assert_eq!(by_editor.len(), 2);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].ad_id, "Summer/ED:kim|UGC");
    }

    #[test]
    fn unmatched_filters_yield_empty_selection() {
        let rows = vec![row("Summer", "AD-1")];
        let filters = FilterSet {
            campaign: "Autumn".to_string(),
            ..FilterSet::default()
        };
        assert!(apply_filters(&rows, &filters).is_empty());
    }

    #[test]
    fn every_dimension_is_a_real_predicate() {
        // No category value short-circuits to an unconditional pass.
        let rows = vec![row("Summer", "STATIC creative")];
        let filters = FilterSet {
            ad_type: "UGC".to_string(),
            ..FilterSet::default()
        };
        assert!(apply_filters(&rows, &filters).is_empty());
    }

    #[test]
    fn options_are_distinct_sorted_with_all_first() {
        let rows = vec![
            row("Winter", "AD-2"),
            row("Summer", "AD-1"),
            row("Summer", "AD-1"),
            row("", "AD-3"),
        ];
        assert_eq!(campaign_options(&rows), vec!["All", "Summer", "Winter"]);
        assert_eq!(ad_options(&rows), vec!["All", "AD-1", "AD-2", "AD-3"]);
    }

    #[test]
    fn describe_lists_active_dimensions_only() {
        let filters = FilterSet {
            campaign: "Summer".to_string(),
            ad_type: "UGC".to_string(),
            ..FilterSet::default()
        };
        assert_eq!(filters.describe(), "campaign = Summer, ad type = UGC");
        assert_eq!(FilterSet::default().describe(), "all rows");
    }
}
