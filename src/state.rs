use std::sync::Arc;
use std::time::Duration;

use crate::chart::{self, BarChartSpec, ChoroplethSpec};
use crate::color::{CategoryColors, ColorScale};
use crate::config::{Cli, View};
use crate::data::animation::{AnimationController, AnimationFrame, PlayState};
use crate::data::filter::{filter, FilterCriteria, YearRange};
use crate::data::model::{Category, EmissionsDataset};

// ---------------------------------------------------------------------------
// Map view state
// ---------------------------------------------------------------------------

/// Slider and playback counters of the map view.
pub struct MapState {
    pub year: i32,
    /// Play button clicks; parity is the play state.
    pub click_count: u64,
    /// Interval ticks since the last toggle into playing.
    pub tick_count: u64,
    /// UI clock time of the last tick.
    last_tick: Option<f64>,
    controller: AnimationController,
    /// Cached chart for `year`.
    pub spec: ChoroplethSpec,
}

impl MapState {
    pub fn play_state(&self) -> PlayState {
        PlayState::from_clicks(self.click_count)
    }

    pub fn interval_disabled(&self) -> bool {
        !self.play_state().is_playing()
    }
}

// ---------------------------------------------------------------------------
// Country view state
// ---------------------------------------------------------------------------

/// Dropdown / checklist / range slider selections of the country view.
pub struct CountryState {
    pub country: String,
    /// Selected sectors, always in dataset column order.
    pub categories: Vec<Category>,
    pub years: YearRange,
    /// Cached chart for the current selection.
    pub spec: BarChartSpec,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Shared read-only dataset.
    pub dataset: Arc<EmissionsDataset>,
    pub view: View,
    pub map: MapState,
    pub country: CountryState,
    pub interval: Duration,
    colors: CategoryColors,
    scale: ColorScale,
    preferred_country: String,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<EmissionsDataset>, cli: &Cli) -> Self {
        let colors = CategoryColors::default();
        let scale = ColorScale::reds(0.0, cli.color_max);
        let map = Self::initial_map(&dataset, &scale);
        let country = Self::initial_country(&dataset, &cli.country, &colors);

        AppState {
            dataset,
            view: cli.view,
            map,
            country,
            interval: cli.interval(),
            colors,
            scale,
            preferred_country: cli.country.clone(),
            status_message: None,
        }
    }

    fn initial_map(dataset: &EmissionsDataset, scale: &ColorScale) -> MapState {
        let year = dataset.domain().min();
        let rows = filter(&dataset.aggregated, &FilterCriteria::Year(year));
        MapState {
            year,
            click_count: 0,
            tick_count: 0,
            last_tick: None,
            controller: AnimationController::new(dataset),
            spec: chart::choropleth(&rows, year, scale),
        }
    }

    fn initial_country(
        dataset: &EmissionsDataset,
        preferred: &str,
        colors: &CategoryColors,
    ) -> CountryState {
        let country = if dataset.has_entity(preferred) {
            preferred.to_string()
        } else {
            log::warn!("'{preferred}' not in dataset, falling back to first entity");
            dataset.entities.first().cloned().unwrap_or_default()
        };
        let domain = dataset.domain();
        let categories = Category::ALL.to_vec();
        let years = YearRange::new(domain.min(), domain.max());
        let spec = Self::build_bar_chart(dataset, &country, years, &categories, colors);
        CountryState {
            country,
            categories,
            years,
            spec,
        }
    }

    /// Swap in a newly loaded dataset and reset both views.
    pub fn set_dataset(&mut self, dataset: Arc<EmissionsDataset>) {
        self.map = Self::initial_map(&dataset, &self.scale);
        self.country = Self::initial_country(&dataset, &self.preferred_country, &self.colors);
        self.dataset = dataset;
        self.status_message = None;
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    // -- map view --------------------------------------------------------

    /// Move the slider by hand.
    pub fn set_map_year(&mut self, year: i32) {
        let domain = self.dataset.domain();
        if !domain.contains(year) {
            log::debug!("Year {year} outside {}–{}, clamping", domain.min(), domain.max());
        }
        self.map.year = domain.clamp(year);
        self.refresh_map();
    }

    /// Play / Pause button.
    pub fn toggle_play(&mut self) {
        self.map.click_count = self.map.click_count.wrapping_add(1);
        self.map.tick_count = 0;
        self.map.last_tick = None;
        log::debug!("Playback {:?}", self.map.play_state());
        self.apply_frame();
    }

    /// One interval tick. Ignored while paused.
    pub fn tick(&mut self) {
        if self.map.interval_disabled() {
            return;
        }
        self.map.tick_count = self.map.tick_count.saturating_add(1);
        self.apply_frame();
    }

    /// Fire a tick if a full interval has elapsed since the last one.
    /// `now` is the UI clock in seconds. Returns whether a tick fired.
    pub fn advance_clock(&mut self, now: f64) -> bool {
        if self.map.interval_disabled() {
            self.map.last_tick = None;
            return false;
        }
        let last = *self.map.last_tick.get_or_insert(now);
        if now - last >= self.interval.as_secs_f64() {
            self.map.last_tick = Some(now);
            self.tick();
            true
        } else {
            false
        }
    }

    fn apply_frame(&mut self) {
        let map = &self.map;
        let frame: AnimationFrame =
            map.controller.step(map.click_count, map.tick_count, Some(map.year));
        if frame.stop {
            // Implicit toggle back to paused after one full sweep.
            self.map.click_count = self.map.click_count.wrapping_add(1);
            self.map.tick_count = 0;
            self.map.last_tick = None;
        }
        if frame.year != self.map.year {
            self.map.year = frame.year;
            self.refresh_map();
        }
    }

    fn refresh_map(&mut self) {
        let rows = filter(&self.dataset.aggregated, &FilterCriteria::Year(self.map.year));
        self.map.spec = chart::choropleth(&rows, self.map.year, &self.scale);
    }

    // -- country view ----------------------------------------------------

    pub fn set_country(&mut self, country: &str) {
        self.country.country = country.to_string();
        self.refresh_country();
    }

    /// Check or uncheck a sector in the checklist.
    pub fn toggle_category(&mut self, category: Category) {
        let selected = &mut self.country.categories;
        if let Some(pos) = selected.iter().position(|&c| c == category) {
            selected.remove(pos);
        } else {
            selected.push(category);
            selected.sort();
        }
        self.refresh_country();
    }

    pub fn select_all(&mut self) {
        self.country.categories = Category::ALL.to_vec();
        self.refresh_country();
    }

    pub fn select_none(&mut self) {
        self.country.categories.clear();
        self.refresh_country();
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let domain = self.dataset.domain();
        self.country.years = YearRange::new(domain.clamp(start), domain.clamp(end));
        self.refresh_country();
    }

    fn refresh_country(&mut self) {
        let c = &self.country;
        let spec =
            Self::build_bar_chart(&self.dataset, &c.country, c.years, &c.categories, &self.colors);
        self.country.spec = spec;
    }

    fn build_bar_chart(
        dataset: &EmissionsDataset,
        country: &str,
        years: YearRange,
        categories: &[Category],
        colors: &CategoryColors,
    ) -> BarChartSpec {
        let criteria = FilterCriteria::CountryRange {
            country: country.to_string(),
            years,
            categories: categories.to_vec(),
        };
        let rows = filter(&dataset.aggregated, &criteria);
        chart::bar_chart(&rows, country, years, categories, colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;
    use clap::Parser;

    fn state() -> AppState {
        let cli = Cli::parse_from(["ghg-viewer"]);
        AppState::new(Arc::new(sample_dataset()), &cli)
    }

    #[test]
    fn starts_paused_at_first_year_with_full_selection() {
        let s = state();
        assert_eq!(s.map.year, 1990);
        assert!(s.map.interval_disabled());
        assert_eq!(s.map.spec.title, "CO2 Emissions by Country in 1990");
        assert_eq!(s.country.country, "United States");
        assert_eq!(s.country.categories.len(), Category::ALL.len());
        assert_eq!((s.country.years.start(), s.country.years.end()), (1990, 2019));
    }

    #[test]
    fn unknown_preferred_country_falls_back_to_first() {
        let cli = Cli::parse_from(["ghg-viewer", "--country", "Atlantis"]);
        let s = AppState::new(Arc::new(sample_dataset()), &cli);
        assert_eq!(s.country.country, "Germany");
    }

    #[test]
    fn playback_sweeps_then_stops() {
        let mut s = state();
        s.set_map_year(2010);

        s.toggle_play();
        assert_eq!(s.map.year, 1990);
        assert!(!s.map.interval_disabled());

        for _ in 0..29 {
            s.tick();
        }
        assert_eq!(s.map.year, 2019);
        assert!(!s.map.interval_disabled());

        s.tick();
        assert!(s.map.interval_disabled());
        assert_eq!(s.map.click_count, 2);
        assert_eq!(s.map.year, 2019);

        s.tick();
        assert_eq!(s.map.year, 2019);
    }

    #[test]
    fn pausing_keeps_current_year() {
        let mut s = state();
        s.toggle_play();
        s.tick();
        s.tick();
        s.toggle_play();
        assert_eq!(s.map.year, 1992);
        assert!(s.map.interval_disabled());
        s.tick();
        assert_eq!(s.map.year, 1992);
    }

    #[test]
    fn clock_fires_once_per_interval() {
        let mut s = state();
        assert!(!s.advance_clock(0.0));

        s.toggle_play();
        assert!(!s.advance_clock(10.0));
        assert!(!s.advance_clock(10.5));
        assert!(s.advance_clock(11.0));
        assert_eq!(s.map.year, 1991);
        assert!(!s.advance_clock(11.2));
        assert!(s.advance_clock(12.1));
        assert_eq!(s.map.year, 1992);
    }

    #[test]
    fn manual_year_is_clamped() {
        let mut s = state();
        s.set_map_year(1800);
        assert_eq!(s.map.year, 1990);
        s.set_map_year(2005);
        assert_eq!(s.map.spec.cells.len(), 2);
    }

    #[test]
    fn checklist_keeps_column_order() {
        let mut s = state();
        s.select_none();
        assert!(s.country.spec.series.is_empty());

        s.toggle_category(Category::Transport);
        s.toggle_category(Category::Agriculture);
        assert_eq!(
            s.country.categories,
            vec![Category::Agriculture, Category::Transport]
        );

        s.toggle_category(Category::Transport);
        assert_eq!(s.country.categories, vec![Category::Agriculture]);
        assert_eq!(s.country.spec.series.len(), 1);
    }

    #[test]
    fn year_range_drives_bar_chart() {
        let mut s = state();
        s.set_year_range(2000, 1995);
        assert_eq!(s.country.spec.title, "United States CO2 Emissions From 1995 to 2000");
        assert!(s.country.spec.series.iter().all(|series| series.points.len() == 6));

        s.set_country("Germany");
        s.set_year_range(1990, 1995);
        assert!(s.country.spec.series.iter().all(|series| series.points.is_empty()));
    }
}
