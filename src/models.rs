use chrono::NaiveDate;
use serde::Deserialize;

/// One ad's recorded state at one weekly checkpoint since its cohort
/// launched. Field names follow the upstream payload; attributes suffixed
/// `_at_launch` are frozen when the creative goes live and never change
/// historically.
///
/// Absent fields deserialize to empty/zero so a sparse row is tolerated
/// rather than rejected. A row without a `cohort_week` cannot join any
/// cohort and is skipped at grouping.
#[derive(Debug, Clone, Deserialize)]
pub struct AdWeekRow {
    pub ad_id: String,
    #[serde(default)]
    pub ad_name_at_launch: String,
    #[allow(dead_code)] // Carried through from the source
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub campaign_name_at_launch: String,
    #[serde(default)]
    pub cohort_week: Option<NaiveDate>,
    /// Weekly checkpoint this row reports, 1..=4.
    #[serde(default)]
    pub week_offset: u8,
    /// 0/1 flag, already cumulative at the source: whether this ad had
    /// ever crossed the success threshold as of this checkpoint.
    #[serde(default)]
    pub hit_cum: u8,
    #[allow(dead_code)] // Carried through from the source
    #[serde(default)]
    pub purchases: i64,
    #[allow(dead_code)] // Carried through from the source
    #[serde(default)]
    pub revenue: f64,
    #[allow(dead_code)] // Carried through from the source
    #[serde(default)]
    pub spend: f64,
}

impl AdWeekRow {
    pub fn is_hit(&self) -> bool {
        self.hit_cum == 1
    }
}

/// Envelope returned by the ad-weeks endpoint. `generated_at` and `count`
/// are informational only; `count` in particular is not checked against
/// `rows.len()`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPayload {
    #[serde(default)]
    pub generated_at: String,
    #[allow(dead_code)] // Informational only
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub rows: Vec<AdWeekRow>,
}

/// Aggregated view of one launch cohort within the filtered population.
#[derive(Debug, Clone)]
pub struct CohortSummary {
    /// Monday anchoring the launch week; identity and descending sort key.
    pub cohort_week: NaiveDate,
    /// Distinct ads observed anywhere in the cohort, floored at 1.
    pub total_assets: usize,
    /// Cumulative hit count at the latest eligible week offset.
    pub hits: usize,
    pub week1: f64,
    pub week2: f64,
    pub week3: f64,
    pub week4: f64,
}

/// Population-wide reduction across cohort summaries. `total_assets` and
/// `hits` are plain sums; the weekly percentages are asset-weighted
/// averages.
#[derive(Debug, Clone, Default)]
pub struct CohortTotals {
    pub total_assets: usize,
    pub hits: usize,
    pub week1: f64,
    pub week2: f64,
    pub week3: f64,
    pub week4: f64,
}
