//! Data layer: core types, loading, aggregation, filtering and playback.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<EmissionRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │  aggregate     │  group by (entity, year) → AggregatedRecord + total
//!   └───────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year / country + range + sectors → ProjectedRow
//!   └──────────┘        ▲
//!                       │ year
//!                 ┌───────────┐
//!                 │ animation  │  (clicks, ticks) → slider year
//!                 └───────────┘
//! ```

pub mod aggregate;
pub mod animation;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::model::{Category, EmissionRecord, EmissionsDataset, CATEGORY_COUNT};

    pub fn record(entity: &str, year: i32, values: &[(Category, f64)]) -> EmissionRecord {
        let mut row = [None; CATEGORY_COUNT];
        for &(cat, v) in values {
            row[cat.index()] = Some(v);
        }
        EmissionRecord {
            entity: entity.to_string(),
            year,
            values: row,
        }
    }

    /// United States 1990–2019 split over two sector rows per year, plus a
    /// shorter Germany series.
    pub fn sample_records() -> Vec<EmissionRecord> {
        let mut rows = Vec::new();
        for year in 1990..=2019 {
            let agri = f64::from(year - 1980);
            rows.push(record("United States", year, &[(Category::Agriculture, agri)]));
            rows.push(record("United States", year, &[(Category::Transport, 5.0)]));
        }
        for year in 2000..=2010 {
            rows.push(record(
                "Germany",
                year,
                &[(Category::Waste, 1.5), (Category::Buildings, 2.0)],
            ));
        }
        rows
    }

    pub fn sample_dataset() -> EmissionsDataset {
        EmissionsDataset::from_records(sample_records()).unwrap()
    }
}
