use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::{Serialize, Serializer};

use crate::color::{CategoryColors, ColorScale};
use crate::data::filter::{ProjectedRow, YearRange};
use crate::data::model::Category;

// ---------------------------------------------------------------------------
// Chart specifications handed to the UI
// ---------------------------------------------------------------------------

/// Stacked bar chart of selected sectors for one country.
#[derive(Debug, Clone, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    /// One series per selected sector, in selection order.
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub name: String,
    #[serde(serialize_with = "serialize_color")]
    pub color: Color32,
    /// `(year, value)`; `None` where the source had no value.
    pub points: Vec<(i32, Option<f64>)>,
}

/// Per-entity colour mapping for one year.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethSpec {
    pub title: String,
    pub color_label: String,
    pub range: [f64; 2],
    /// Sorted by value, largest first.
    pub cells: Vec<ChoroplethCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethCell {
    pub entity: String,
    pub value: f64,
    #[serde(serialize_with = "serialize_color")]
    pub color: Color32,
}

fn serialize_color<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!(
        "#{:02x}{:02x}{:02x}",
        color.r(),
        color.g(),
        color.b()
    ))
}

// ---------------------------------------------------------------------------
// Adapters: filtered rows → chart spec
// ---------------------------------------------------------------------------

/// Build the country bar chart from rows of a country/range filter.
pub fn bar_chart(
    rows: &[ProjectedRow],
    country: &str,
    years: YearRange,
    categories: &[Category],
    colors: &CategoryColors,
) -> BarChartSpec {
    let series = categories
        .iter()
        .map(|&cat| BarSeries {
            name: cat.column_name().to_string(),
            color: colors.color_for(cat),
            points: rows.iter().map(|r| (r.year, r.value(cat))).collect(),
        })
        .collect();

    BarChartSpec {
        title: format!(
            "{country} CO2 Emissions From {} to {}",
            years.start(),
            years.end()
        ),
        x_label: "Year".to_string(),
        y_label: "Amount of Carbon Emission".to_string(),
        legend_title: "Emission Types".to_string(),
        series,
    }
}

/// Build the choropleth mapping from rows of a point-year filter.
pub fn choropleth(rows: &[ProjectedRow], year: i32, scale: &ColorScale) -> ChoroplethSpec {
    let mut cells: Vec<ChoroplethCell> = rows
        .iter()
        .map(|r| {
            let value = r
                .total
                .unwrap_or_else(|| r.values.iter().filter_map(|(_, v)| *v).sum());
            ChoroplethCell {
                entity: r.entity.clone(),
                value,
                color: scale.color_for(value),
            }
        })
        .collect();
    cells.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.entity.cmp(&b.entity)));

    let (min, max) = scale.range();
    ChoroplethSpec {
        title: format!("CO2 Emissions by Country in {year}"),
        color_label: "Total Emissions".to_string(),
        range: [min, max],
        cells,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write a chart spec as pretty-printed JSON.
pub fn export_json<T: Serialize>(spec: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, spec).context("serializing chart")?;
    writer.flush().context("writing chart")?;
    log::info!("Exported chart to {}", path.display());
    Ok(())
}
