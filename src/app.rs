use eframe::egui;

use crate::config::View;
use crate::state::AppState;
use crate::ui::{map, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EmissionsApp {
    pub state: AppState,
}

impl EmissionsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EmissionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Playback interval ----
        let now = ctx.input(|i| i.time);
        self.state.advance_clock(now);
        if !self.state.map.interval_disabled() {
            ctx.request_repaint_after(self.state.interval);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Map => map::choropleth_view(ui, &self.state),
            View::Country => plot::bar_chart_plot(ui, &self.state),
        });
    }
}
