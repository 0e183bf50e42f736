use std::collections::BTreeMap;

use super::model::{AggregatedRecord, Category, EmissionRow, CATEGORY_COUNT};

// ---------------------------------------------------------------------------
// Group-by (entity, year) → summed sector values
// ---------------------------------------------------------------------------

/// Collapse rows sharing an (entity, year) key into one [`AggregatedRecord`].
///
/// * every sector column is summed across the group; empty cells count as 0
/// * the total is derived per output row, after grouping
/// * output is sorted by entity, then year
///
/// Accepts any [`EmissionRow`], so already-aggregated rows can be fed back in
/// and come out unchanged.
pub fn aggregate<R: EmissionRow>(records: &[R]) -> Vec<AggregatedRecord> {
    let mut groups: BTreeMap<(&str, i32), [f64; CATEGORY_COUNT]> = BTreeMap::new();

    for rec in records {
        let sums = groups
            .entry((rec.entity(), rec.year()))
            .or_insert([0.0; CATEGORY_COUNT]);
        for cat in Category::ALL {
            sums[cat.index()] += rec.value(cat).unwrap_or(0.0);
        }
    }

    log::debug!(
        "Aggregated {} rows into {} (entity, year) groups",
        records.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|((entity, year), values)| AggregatedRecord {
            entity: entity.to_string(),
            year,
            values,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{record, sample_records};

    #[test]
    fn duplicate_sector_rows_collapse_into_one() {
        let rows = vec![
            record("United States", 2000, &[(Category::Agriculture, 10.0)]),
            record("United States", 2000, &[(Category::Transport, 5.0)]),
        ];

        let agg = aggregate(&rows);

        assert_eq!(agg.len(), 1);
        let us = &agg[0];
        assert_eq!(us.entity, "United States");
        assert_eq!(us.year, 2000);
        assert_eq!(us.values[Category::Agriculture.index()], 10.0);
        assert_eq!(us.values[Category::Transport.index()], 5.0);
        assert_eq!(us.total_emissions(), 15.0);
    }

    #[test]
    fn one_row_per_key_and_total_matches_columns() {
        let rows = sample_records();
        let agg = aggregate(&rows);

        let mut keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.entity.as_str(), r.year)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(agg.len(), keys.len());

        for rec in &agg {
            let sum: f64 = Category::ALL.iter().map(|c| rec.values[c.index()]).sum();
            assert_eq!(rec.total(), Some(sum));
        }
    }

    #[test]
    fn missing_cells_count_as_zero() {
        let rows = vec![
            record("Chad", 1995, &[]),
            record("Chad", 1995, &[(Category::Waste, 2.5)]),
        ];

        let agg = aggregate(&rows);

        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].values[Category::Agriculture.index()], 0.0);
        assert_eq!(agg[0].total_emissions(), 2.5);
    }

    #[test]
    fn output_is_sorted_by_entity_then_year() {
        let rows = vec![
            record("Peru", 1991, &[]),
            record("Chile", 1992, &[]),
            record("Peru", 1990, &[]),
            record("Chile", 1990, &[]),
        ];

        let keys: Vec<(String, i32)> = aggregate(&rows)
            .into_iter()
            .map(|r| (r.entity, r.year))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Chile".to_string(), 1990),
                ("Chile".to_string(), 1992),
                ("Peru".to_string(), 1990),
                ("Peru".to_string(), 1991),
            ]
        );
    }

    #[test]
    fn reaggregating_is_a_no_op() {
        let once = aggregate(&sample_records());
        let twice = aggregate(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let rows: Vec<crate::data::model::EmissionRecord> = Vec::new();
        assert!(aggregate(&rows).is_empty());
    }
}
