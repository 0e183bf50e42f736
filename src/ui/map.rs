use eframe::egui::{self, Color32, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorScale;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth view (central panel)
// ---------------------------------------------------------------------------

/// Render the choropleth spec as a colour bar plus a ranked, colour-coded
/// table of entities.
pub fn choropleth_view(ui: &mut Ui, state: &AppState) {
    let spec = &state.map.spec;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(spec.title.as_str());
    });
    color_bar(ui, state.scale(), &spec.color_label);
    ui.separator();

    if spec.cells.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data for this year.");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(120.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Entity");
            });
            header.col(|ui| {
                ui.strong(spec.color_label.as_str());
            });
        })
        .body(|body| {
            body.rows(20.0, spec.cells.len(), |mut row| {
                let Some(cell) = spec.cells.get(row.index()) else {
                    return;
                };
                let rank = row.index() + 1;
                row.col(|ui| {
                    ui.label(rank.to_string());
                });
                row.col(|ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        swatch(ui, cell.color);
                        ui.label(cell.entity.as_str());
                    });
                });
                row.col(|ui| {
                    ui.label(format_tonnes(cell.value));
                });
            });
        });
}

fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

/// Horizontal gradient legend for the colour scale.
fn color_bar(ui: &mut Ui, scale: &ColorScale, label: &str) {
    const STEPS: usize = 64;
    let (min, max) = scale.range();

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(label).strong());
        ui.label(format_tonnes(min));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 14.0), Sense::hover());
        let step_width = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let value = min + (max - min) * (i as f64 + 0.5) / STEPS as f64;
            let left = rect.left() + step_width * i as f32;
            let slice = egui::Rect::from_min_max(
                egui::pos2(left, rect.top()),
                egui::pos2(left + step_width, rect.bottom()),
            );
            ui.painter().rect_filled(slice, 0.0, scale.color_for(value));
        }
        ui.label(format_tonnes(max));
    });
}

/// Human-readable tonnes of CO2-equivalent.
pub fn format_tonnes(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2} Gt", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2} Mt", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1} kt", value / 1e3)
    } else {
        format!("{value:.0} t")
    }
}

#[cfg(test)]
mod tests {
    use super::format_tonnes;

    #[test]
    fn tonnes_are_scaled() {
        assert_eq!(format_tonnes(5e9), "5.00 Gt");
        assert_eq!(format_tonnes(2_500_000.0), "2.50 Mt");
        assert_eq!(format_tonnes(1500.0), "1.5 kt");
        assert_eq!(format_tonnes(12.0), "12 t");
        assert_eq!(format_tonnes(0.0), "0 t");
    }
}
