use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::config;
use super::derived;
use super::models::{ChainTable, OptionRecord, OptionType};
use crate::error::DashboardError;

/// The three bar charts the dashboard offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlotKind {
    #[serde(rename = "change-in-oi")]
    ChangeInOpenInterest,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "open-interest")]
    OpenInterestByExpiry,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [
        PlotKind::ChangeInOpenInterest,
        PlotKind::Volume,
        PlotKind::OpenInterestByExpiry,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            PlotKind::ChangeInOpenInterest => "change-in-oi",
            PlotKind::Volume => "volume",
            PlotKind::OpenInterestByExpiry => "open-interest",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlotKind::ChangeInOpenInterest => "Change in Open Interest vs. Strike Price",
            PlotKind::Volume => "Volume vs. Strike Price (Filtered for Volume > 0)",
            PlotKind::OpenInterestByExpiry => {
                "Open Interest vs. Strike Price (Grouped by Call/Put, Ordered by Days to Expiry Descending)"
            }
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            PlotKind::OpenInterestByExpiry => "Strike Price (Ordered by Days to Expiry Descending)",
            _ => "Strike Price",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            PlotKind::ChangeInOpenInterest => "Change in Open Interest (ΔOI)",
            PlotKind::Volume => "Volume",
            PlotKind::OpenInterestByExpiry => "Open Interest",
        }
    }
}

impl FromStr for PlotKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PlotKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| DashboardError::UnknownPlot(s.to_string()))
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub strike: f64,
    pub value: i64,
    pub option_type: OptionType,
    pub expiration_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    pub call: &'static str,
    pub put: &'static str,
}

impl Palette {
    pub fn color_for(&self, option_type: OptionType) -> &'static str {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            call: config::CALL_COLOR,
            put: config::PUT_COLOR,
        }
    }
}

/// Everything a renderer needs to draw one bar chart (x = strike, hue = side)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub kind: PlotKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<BarPoint>,
    /// Label every n-th strike
    pub tick_stride: usize,
    pub palette: Palette,
}

pub fn build_plot(kind: PlotKind, chain: &ChainTable) -> PlotData {
    let points: Vec<BarPoint> = match kind {
        PlotKind::ChangeInOpenInterest => {
            let derived = derived::with_change_in_oi(chain);
            derived::non_zero_changes(&derived)
                .into_iter()
                .map(|row| point(&row.record, row.change_in_oi))
                .collect()
        }
        PlotKind::Volume => derived::positive_volume(chain)
            .into_iter()
            .map(|r| point(r, r.volume as i64))
            .collect(),
        PlotKind::OpenInterestByExpiry => {
            derived::positive_open_interest_sorted_by_expiry_desc(chain)
                .into_iter()
                .map(|r| point(r, r.open_interest as i64))
                .collect()
        }
    };

    // Only the volume and open-interest charts thin their x axis
    let stride = match kind {
        PlotKind::ChangeInOpenInterest => 1,
        PlotKind::Volume | PlotKind::OpenInterestByExpiry => {
            tick_stride(derived::unique_strike_count(points.iter().map(|p| p.strike)))
        }
    };

    PlotData {
        kind,
        title: kind.title(),
        x_label: kind.x_label(),
        y_label: kind.y_label(),
        points,
        tick_stride: stride,
        palette: Palette::default(),
    }
}

/// Thin the x axis to roughly `MAX_X_TICKS` labels
pub fn tick_stride(unique_strikes: usize) -> usize {
    if unique_strikes > config::MAX_X_TICKS {
        unique_strikes / config::MAX_X_TICKS
    } else {
        1
    }
}

fn point(record: &OptionRecord, value: i64) -> BarPoint {
    BarPoint {
        strike: record.strike,
        value,
        option_type: record.option_type,
        expiration_date: record.expiration_date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_kind_parse() {
        assert_eq!("volume".parse::<PlotKind>().unwrap(), PlotKind::Volume);
        assert_eq!(" Change-In-OI ".parse::<PlotKind>().unwrap(), PlotKind::ChangeInOpenInterest);
        assert!(matches!(
            "pie".parse::<PlotKind>(),
            Err(DashboardError::UnknownPlot(_))
        ));
    }

    #[test]
    fn test_tick_stride() {
        assert_eq!(tick_stride(0), 1);
        assert_eq!(tick_stride(20), 1);
        assert_eq!(tick_stride(21), 1);
        assert_eq!(tick_stride(45), 2);
        assert_eq!(tick_stride(100), 5);
    }

    #[test]
    fn test_palette() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(OptionType::Call), "green");
        assert_eq!(palette.color_for(OptionType::Put), "red");
    }
}
