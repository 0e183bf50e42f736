use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Category – one emission sector column
// ---------------------------------------------------------------------------

/// Number of emission-sector columns in the dataset.
pub const CATEGORY_COUNT: usize = 11;

/// One greenhouse-gas source sector. Variant order mirrors the column order
/// of the source CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Agriculture,
    LandUseChange,
    Waste,
    Industry,
    Manufacturing,
    Transport,
    ElectricityAndHeat,
    Buildings,
    Fugitive,
    OtherFuelCombustion,
    AviationAndShipping,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Agriculture,
        Category::LandUseChange,
        Category::Waste,
        Category::Industry,
        Category::Manufacturing,
        Category::Transport,
        Category::ElectricityAndHeat,
        Category::Buildings,
        Category::Fugitive,
        Category::OtherFuelCombustion,
        Category::AviationAndShipping,
    ];

    /// Exact header used by the dataset for this sector.
    pub const fn column_name(self) -> &'static str {
        match self {
            Category::Agriculture => "Agriculture",
            Category::LandUseChange => "Land-use change and forestry",
            Category::Waste => "Waste",
            Category::Industry => "Industry",
            Category::Manufacturing => "Manufacturing and construction",
            Category::Transport => "Transport",
            Category::ElectricityAndHeat => "Electricity and heat",
            Category::Buildings => "Buildings",
            Category::Fugitive => "Fugitive emissions",
            Category::OtherFuelCombustion => "Other fuel combustion",
            Category::AviationAndShipping => "Aviation and shipping",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.column_name() == name)
    }

    /// Position of this category in [`Category::ALL`] and in value arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Common read access to raw and aggregated rows, so the filter engine can
/// work on either table.
pub trait EmissionRow {
    fn entity(&self) -> &str;
    fn year(&self) -> i32;
    /// `None` when the source cell was empty.
    fn value(&self, category: Category) -> Option<f64>;
    /// Derived total, only present on aggregated rows.
    fn total(&self) -> Option<f64> {
        None
    }
}

/// One raw row of the source file. (entity, year) may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    pub entity: String,
    pub year: i32,
    pub values: [Option<f64>; CATEGORY_COUNT],
}

impl EmissionRow for EmissionRecord {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn value(&self, category: Category) -> Option<f64> {
        self.values[category.index()]
    }
}

/// Exactly one row per (entity, year) with summed sector values.
///
/// The total is not stored: it is always recomputed from `values`, so it can
/// never drift from the category columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub entity: String,
    pub year: i32,
    pub values: [f64; CATEGORY_COUNT],
}

impl AggregatedRecord {
    pub fn total_emissions(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl EmissionRow for AggregatedRecord {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn value(&self, category: Category) -> Option<f64> {
        Some(self.values[category.index()])
    }

    fn total(&self) -> Option<f64> {
        Some(self.total_emissions())
    }
}

// ---------------------------------------------------------------------------
// YearDomain
// ---------------------------------------------------------------------------

/// Inclusive bound of the years present in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearDomain {
    min: i32,
    max: i32,
}

impl YearDomain {
    /// Derive the domain from a set of years; `None` when empty.
    pub fn from_years<I: IntoIterator<Item = i32>>(years: I) -> Option<Self> {
        let mut iter = years.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some(YearDomain { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// EmissionsDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Built once and shared read-only (behind an `Arc`).
#[derive(Debug, Clone)]
pub struct EmissionsDataset {
    /// Raw rows in file order.
    pub records: Vec<EmissionRecord>,
    /// One row per (entity, year), sorted by entity then year.
    pub aggregated: Vec<AggregatedRecord>,
    /// Sorted distinct years.
    pub years: Vec<i32>,
    /// Sorted distinct entity names.
    pub entities: Vec<String>,
    domain: YearDomain,
}

impl EmissionsDataset {
    /// Aggregate the raw rows and build the year/entity indices.
    pub fn from_records(records: Vec<EmissionRecord>) -> Result<Self, DatasetError> {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let domain =
            YearDomain::from_years(years.iter().copied()).ok_or(DatasetError::Empty)?;
        let entities: BTreeSet<&str> = records.iter().map(|r| r.entity.as_str()).collect();
        let entities = entities.into_iter().map(str::to_string).collect();
        let aggregated = super::aggregate::aggregate(&records);

        Ok(EmissionsDataset {
            records,
            aggregated,
            years: years.into_iter().collect(),
            entities,
            domain,
        })
    }

    pub fn domain(&self) -> YearDomain {
        self.domain
    }

    /// Number of distinct years, i.e. the length of one animation sweep.
    pub fn distinct_years(&self) -> usize {
        self.years.len()
    }

    pub fn has_entity(&self, entity: &str) -> bool {
        self.entities
            .binary_search_by(|e| e.as_str().cmp(entity))
            .is_ok()
    }

    /// Number of raw rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset contains no rows")]
    Empty,
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: '{value}' is not a valid year")]
    InvalidYear { row: usize, value: String },
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    #[test]
    fn category_names_round_trip_in_column_order() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
            assert_eq!(Category::from_column_name(cat.column_name()), Some(*cat));
        }
        assert_eq!(Category::from_column_name("Code"), None);
    }

    #[test]
    fn year_domain_bounds_and_clamp() {
        let d = YearDomain::from_years([2005, 1990, 2019]).unwrap();
        assert_eq!((d.min(), d.max()), (1990, 2019));
        assert_eq!(d.clamp(1800), 1990);
        assert_eq!(d.clamp(2050), 2019);
        assert!(d.contains(2000));
        assert!(YearDomain::from_years(Vec::new()).is_none());
    }

    #[test]
    fn dataset_indexes_years_and_entities() {
        let ds = EmissionsDataset::from_records(vec![
            record("Chile", 1991, &[(Category::Waste, 1.0)]),
            record("Angola", 1990, &[(Category::Waste, 2.0)]),
            record("Chile", 1990, &[(Category::Waste, 3.0)]),
        ])
        .unwrap();

        assert_eq!(ds.years, vec![1990, 1991]);
        assert_eq!(ds.entities, vec!["Angola", "Chile"]);
        assert_eq!(ds.distinct_years(), 2);
        assert!(ds.has_entity("Chile"));
        assert!(!ds.has_entity("Peru"));
        assert_eq!(ds.aggregated.len(), 3);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = EmissionsDataset::from_records(Vec::new()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }
}
