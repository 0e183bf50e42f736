use super::model::{Category, EmissionRow};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive year range. Built through [`YearRange::new`] so `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Bounds given in reverse order are swapped.
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Which rows and columns to select.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCriteria {
    /// Every entity for a single year, all sectors (map view).
    Year(i32),
    /// One entity over a year range, restricted to `categories` in the given
    /// order (country view).
    CountryRange {
        country: String,
        years: YearRange,
        categories: Vec<Category>,
    },
}

// ---------------------------------------------------------------------------
// Filtered output
// ---------------------------------------------------------------------------

/// A selected row with only the requested sector columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub entity: String,
    pub year: i32,
    /// Projected columns, in the order requested by the caller.
    pub values: Vec<(Category, Option<f64>)>,
    /// Present only when filtering aggregated rows.
    pub total: Option<f64>,
}

impl ProjectedRow {
    fn project<R: EmissionRow>(row: &R, categories: &[Category]) -> Self {
        ProjectedRow {
            entity: row.entity().to_string(),
            year: row.year(),
            values: categories.iter().map(|&c| (c, row.value(c))).collect(),
            total: row.total(),
        }
    }

    pub fn value(&self, category: Category) -> Option<f64> {
        self.values
            .iter()
            .find(|(c, _)| *c == category)
            .and_then(|(_, v)| *v)
    }
}

/// Select the rows matching `criteria`, preserving input order.
///
/// Unknown years or countries are not errors: they simply match nothing.
/// The input slice is only read.
pub fn filter<R: EmissionRow>(records: &[R], criteria: &FilterCriteria) -> Vec<ProjectedRow> {
    let rows: Vec<ProjectedRow> = match criteria {
        FilterCriteria::Year(year) => records
            .iter()
            .filter(|r| r.year() == *year)
            .map(|r| ProjectedRow::project(r, &Category::ALL))
            .collect(),
        FilterCriteria::CountryRange {
            country,
            years,
            categories,
        } => records
            .iter()
            .filter(|r| r.entity() == country && years.contains(r.year()))
            .map(|r| ProjectedRow::project(r, categories))
            .collect(),
    };

    log::debug!("Filter {criteria:?} matched {} rows", rows.len());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::fixtures::{record, sample_records};

    #[test]
    fn point_year_keeps_only_that_year() {
        let agg = aggregate(&sample_records());

        let rows = filter(&agg, &FilterCriteria::Year(2005));

        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.year == 2005));
        assert!(rows.iter().all(|r| r.total.is_some()));
        assert_eq!(rows[0].values.len(), Category::ALL.len());
    }

    #[test]
    fn absent_year_yields_empty() {
        let agg = aggregate(&sample_records());
        assert!(filter(&agg, &FilterCriteria::Year(1850)).is_empty());
    }

    #[test]
    fn country_range_selects_inclusive_years_and_projects_columns() {
        let criteria = FilterCriteria::CountryRange {
            country: "United States".to_string(),
            years: YearRange::new(1995, 2000),
            categories: vec![Category::Agriculture],
        };

        let agg = aggregate(&sample_records());
        let rows = filter(&agg, &criteria);

        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1995, 1996, 1997, 1998, 1999, 2000]);
        for row in &rows {
            assert_eq!(row.entity, "United States");
            let projected: Vec<Category> = row.values.iter().map(|(c, _)| *c).collect();
            assert_eq!(projected, vec![Category::Agriculture]);
            assert_eq!(row.value(Category::Transport), None);
        }
    }

    #[test]
    fn projection_keeps_requested_order() {
        let rows = vec![record(
            "Kenya",
            2010,
            &[(Category::Waste, 1.0), (Category::Transport, 2.0)],
        )];
        let criteria = FilterCriteria::CountryRange {
            country: "Kenya".to_string(),
            years: YearRange::new(2000, 2020),
            categories: vec![Category::Transport, Category::Buildings, Category::Waste],
        };

        let out = filter(&rows, &criteria);

        assert_eq!(
            out[0].values,
            vec![
                (Category::Transport, Some(2.0)),
                (Category::Buildings, None),
                (Category::Waste, Some(1.0)),
            ]
        );
        assert_eq!(out[0].total, None);
    }

    #[test]
    fn unknown_country_yields_empty() {
        let criteria = FilterCriteria::CountryRange {
            country: "Atlantis".to_string(),
            years: YearRange::new(1990, 2019),
            categories: Category::ALL.to_vec(),
        };
        assert!(filter(&sample_records(), &criteria).is_empty());
    }

    #[test]
    fn reversed_range_is_normalised() {
        let range = YearRange::new(2000, 1995);
        assert_eq!((range.start(), range.end()), (1995, 2000));
        assert!(range.contains(1995) && range.contains(2000));
        assert!(!range.contains(2001));
    }

    #[test]
    fn filtering_does_not_touch_input() {
        let rows = sample_records();
        let before = rows.clone();
        let _ = filter(&rows, &FilterCriteria::Year(2000));
        assert_eq!(rows, before);
    }
}
