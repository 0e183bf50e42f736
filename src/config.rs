use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Default colour range upper bound for the map (5 billion tonnes).
pub const DEFAULT_COLOR_MAX: f64 = 5e9;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Greenhouse-gas emissions viewer", long_about = None)]
pub struct Cli {
    /// Emissions dataset (.csv, .parquet or .json)
    #[arg(short, long, default_value = "ghg-emissions-by-sector.csv")]
    pub data: PathBuf,

    /// View shown at startup
    #[arg(long, value_enum, default_value_t = View::Map)]
    pub view: View,

    /// Country preselected in the country view
    #[arg(long, default_value = "United States")]
    pub country: String,

    /// Playback interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Upper bound of the map colour scale
    #[arg(long, default_value_t = DEFAULT_COLOR_MAX, value_parser = parse_color_max)]
    pub color_max: f64,
}

fn parse_color_max(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive finite number, got {s}"))
    }
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Choropleth of total emissions with year playback
    Map,
    /// Per-country sector bar chart
    Country,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["ghg-viewer"]);
        assert_eq!(cli.data, PathBuf::from("ghg-emissions-by-sector.csv"));
        assert_eq!(cli.view, View::Map);
        assert_eq!(cli.country, "United States");
        assert_eq!(cli.interval(), Duration::from_secs(1));
        assert_eq!(cli.color_max, DEFAULT_COLOR_MAX);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "ghg-viewer",
            "--data",
            "emissions.parquet",
            "--view",
            "country",
            "--country",
            "India",
            "--interval-ms",
            "250",
        ]);
        assert_eq!(cli.view, View::Country);
        assert_eq!(cli.country, "India");
        assert_eq!(cli.interval(), Duration::from_millis(250));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["ghg-viewer", "--interval-ms", "0"]).is_err());
    }

    #[test]
    fn color_max_must_be_positive_and_finite() {
        for bad in ["0", "-1", "NaN", "inf", "lots"] {
            let args = ["ghg-viewer", "--color-max", bad];
            assert!(Cli::try_parse_from(args).is_err(), "{bad}");
        }
        let cli = Cli::parse_from(["ghg-viewer", "--color-max", "1e10"]);
        assert_eq!(cli.color_max, 1e10);
    }
}
