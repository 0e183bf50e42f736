use super::model::{EmissionsDataset, YearDomain};

// ---------------------------------------------------------------------------
// Play / pause state machine
// ---------------------------------------------------------------------------

/// Playback state, derived from the parity of the Play button click count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Playing,
}

impl PlayState {
    /// Odd click counts mean playing.
    pub fn from_clicks(click_count: u64) -> Self {
        if click_count % 2 == 1 {
            PlayState::Playing
        } else {
            PlayState::Paused
        }
    }

    pub fn is_playing(self) -> bool {
        self == PlayState::Playing
    }
}

/// Result of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Year the slider should show. Always inside the year domain.
    pub year: i32,
    /// Whether the interval timer should be off.
    pub interval_disabled: bool,
    /// A full sweep has finished; the caller should toggle back to paused.
    pub stop: bool,
}

/// Drives the map year slider during playback.
///
/// Playback always sweeps forward over the dataset's distinct years, starting
/// at the first year on the toggle into [`PlayState::Playing`]. The
/// controller holds no mutable state: every call is a pure function of the
/// counters owned by the UI and the slider's current value.
#[derive(Debug, Clone)]
pub struct AnimationController {
    domain: YearDomain,
    /// Sorted distinct years; never empty.
    years: Vec<i32>,
}

impl AnimationController {
    pub fn new(dataset: &EmissionsDataset) -> Self {
        log::debug!("Animation sweep covers {} years", dataset.distinct_years());
        AnimationController {
            domain: dataset.domain(),
            years: dataset.years.clone(),
        }
    }

    /// Number of ticks in one full sweep.
    pub fn sweep_len(&self) -> u64 {
        self.years.len() as u64
    }

    /// Evaluate the controller.
    ///
    /// `tick_count` counts interval ticks since the last toggle into playing.
    /// `prior_year` is the slider value before this call, used while paused.
    pub fn step(&self, click_count: u64, tick_count: u64, prior_year: Option<i32>) -> AnimationFrame {
        match PlayState::from_clicks(click_count) {
            PlayState::Paused => AnimationFrame {
                year: prior_year.map_or(self.domain.min(), |y| self.domain.clamp(y)),
                interval_disabled: true,
                stop: false,
            },
            PlayState::Playing => {
                let stop = tick_count >= self.sweep_len();
                let idx = usize::try_from(tick_count)
                    .unwrap_or(usize::MAX)
                    .min(self.years.len().saturating_sub(1));
                let year = self
                    .years
                    .get(idx)
                    .copied()
                    .map_or(self.domain.min(), |y| self.domain.clamp(y));
                if stop {
                    log::debug!("Sweep finished after {tick_count} ticks at {year}");
                }
                AnimationFrame {
                    year,
                    interval_disabled: stop,
                    stop,
                }
            }
        }
    }
}
