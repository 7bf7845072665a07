use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::models::{AdWeekRow, ApiPayload};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One-shot fetch of the ad-weeks payload. No retry and no backoff; a
/// failed load is terminal for this cycle.
pub async fn fetch_payload(url: &str) -> anyhow::Result<ApiPayload> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;

    if !response.status().is_success() {
        bail!("{url} returned {}", response.status());
    }

    response
        .json::<ApiPayload>()
        .await
        .context("failed to decode ad-weeks payload")
}

/// Load a payload snapshot saved from the endpoint, for offline re-runs.
pub fn load_json(path: &Path) -> anyhow::Result<ApiPayload> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Import flat ad-week rows from a CSV export.
pub fn import_csv(path: &Path) -> anyhow::Result<Vec<AdWeekRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<AdWeekRow>() {
        rows.push(result.context("failed to parse CSV row")?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn csv_rows_deserialize() {
        let data = "\
ad_id,ad_name_at_launch,campaign_id,campaign_name_at_launch,cohort_week,week_offset,hit_cum,purchases,revenue,spend
ad_1,ED:kim|UGC,cmp_1,Summer,2026-07-06,1,1,3,120.5,80.0
ad_2,ED:lee|STATIC,cmp_1,Summer,,2,0,0,0.0,0.0
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<AdWeekRow> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("rows should deserialize");

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].cohort_week,
            NaiveDate::from_ymd_opt(2026, 7, 6)
        );
        assert!(rows[0].is_hit());
        assert_eq!(rows[1].cohort_week, None);
        assert!(!rows[1].is_hit());
    }
}
