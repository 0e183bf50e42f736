use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart;
use crate::config::View;
use crate::data::model::Category;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – view controls
// ---------------------------------------------------------------------------

/// Render the left control panel for the active view.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    match state.view {
        View::Map => map_controls(ui, state),
        View::Country => country_controls(ui, state),
    }
}

fn map_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CO2 Emissions Choropleth Map");
    ui.separator();

    let domain = state.dataset.domain();
    ui.label("Select a year:");
    let mut year = state.map.year;
    let slider = egui::Slider::new(&mut year, domain.min()..=domain.max()).step_by(1.0);
    if ui.add(slider).changed() {
        state.set_map_year(year);
    }

    ui.add_space(8.0);
    let label = if state.map.play_state().is_playing() {
        "Pause"
    } else {
        "Play"
    };
    if ui.button(label).clicked() {
        state.toggle_play();
    }
}

fn country_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("GLOBAL CO2 CONTRIBUTIONS").strong());
    ui.label(
        "Explore each country's contributions and filter through emission types and years.",
    );
    ui.separator();

    // ---- Country dropdown ----
    ui.strong("Select Country:");
    let current = state.country.country.clone();
    let dataset = Arc::clone(&state.dataset);
    egui::ComboBox::from_id_salt("country")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ScrollArea::vertical().max_height(300.0).show(ui, |ui: &mut Ui| {
                for entity in &dataset.entities {
                    if ui.selectable_label(current == *entity, entity).clicked() {
                        state.set_country(entity);
                    }
                }
            });
        });
    ui.separator();

    // ---- Emission type checklist ----
    ui.strong("Select Emission Types:");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    for cat in Category::ALL {
        let mut checked = state.country.categories.contains(&cat);
        if ui.checkbox(&mut checked, cat.column_name()).changed() {
            state.toggle_category(cat);
        }
    }
    ui.separator();

    // ---- Year range ----
    ui.strong("Select Year Range:");
    let domain = state.dataset.domain();
    let mut start = state.country.years.start();
    let mut end = state.country.years.end();
    let from = ui.add(egui::Slider::new(&mut start, domain.min()..=domain.max()).text("from"));
    let to = ui.add(egui::Slider::new(&mut end, domain.min()..=domain.max()).text("to"));
    if from.changed() || to.changed() {
        state.set_year_range(start, end);
    }

    ui.add_space(12.0);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("More on greenhouse gas emissions:");
        ui.hyperlink_to("EPA's GHG Emissions website", "https://www.epa.gov/ghgemissions");
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export chart…").clicked() {
                export_chart_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.selectable_label(state.view == View::Map, "Map").clicked() {
            state.view = View::Map;
        }
        if ui
            .selectable_label(state.view == View::Country, "Country")
            .clicked()
        {
            state.view = View::Country;
        }

        ui.separator();

        let ds = &state.dataset;
        ui.label(format!(
            "{} rows, {} entities, {} years ({}–{})",
            ds.len(),
            ds.entities.len(),
            ds.distinct_years(),
            ds.domain().min(),
            ds.domain().max()
        ));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open emissions data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(Arc::new(dataset)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Save the chart of the active view as JSON.
pub fn export_chart_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .add_filter("JSON", &["json"])
        .set_file_name("chart.json")
        .save_file();

    let Some(path) = file else {
        return;
    };
    let result = match state.view {
        View::Map => chart::export_json(&state.map.spec, &path),
        View::Country => chart::export_json(&state.country.spec, &path),
    };
    if let Err(e) = result {
        log::error!("Failed to export chart: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
