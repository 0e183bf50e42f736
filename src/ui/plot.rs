use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Country bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the stacked sector bar chart of the country view.
pub fn bar_chart_plot(ui: &mut Ui, state: &AppState) {
    let spec = &state.country.spec;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(spec.title.as_str());
    });

    if spec.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select at least one emission type.");
        });
        return;
    }

    // Missing values stack as zero so bars stay aligned by year.
    let mut charts: Vec<BarChart> = Vec::with_capacity(spec.series.len());
    for series in &spec.series {
        let bars: Vec<Bar> = series
            .points
            .iter()
            .map(|&(year, value)| {
                Bar::new(f64::from(year), value.unwrap_or(0.0))
                    .width(0.8)
                    .name(year)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(series.name.as_str())
            .color(series.color)
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("country_bar_chart")
        .legend(Legend::default())
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
