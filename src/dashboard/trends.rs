//! Trend projection
//!
//! Maps a time-bucketed activity series onto 2-D plot coordinates.
//! Pure linear scaling with no smoothing: x spreads the points evenly
//! across the padded plot width, y grows downward from the top of the
//! padded plot area as values shrink (screen coordinates).

use serde::Serialize;

use super::models::TrendSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// The two projected data lines of a trend chart.
#[derive(Debug, Clone, Serialize)]
pub struct TrendProjection {
    pub attempts: Vec<PlotPoint>,
    pub reviews: Vec<PlotPoint>,
}

/// Project a trend series into plot coordinates.
///
/// The value scale is shared between the two lines and floored at 1 so
/// an all-zero series maps to the plot baseline instead of dividing by
/// zero.
pub fn project(
    series: &TrendSeries,
    plot_width: f64,
    plot_height: f64,
    padding: f64,
) -> TrendProjection {
    let n = series.labels.len();
    let max_value = series
        .attempts
        .iter()
        .chain(series.reviews.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let step = (plot_width - 2.0 * padding) / (n.saturating_sub(1).max(1) as f64);
    let map_line = |values: &[i64]| -> Vec<PlotPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| PlotPoint {
                x: padding + i as f64 * step,
                y: plot_height - padding - (plot_height - 2.0 * padding) * (value as f64 / max_value),
            })
            .collect()
    };

    TrendProjection {
        attempts: map_line(&series.attempts),
        reviews: map_line(&series.reviews),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(attempts: Vec<i64>, reviews: Vec<i64>) -> TrendSeries {
        let labels = (0..attempts.len()).map(|i| format!("d{}", i)).collect();
        TrendSeries {
            labels,
            attempts,
            reviews,
        }
    }

    #[test]
    fn test_orientation_higher_value_smaller_y() {
        // 3-point series [0, 5, 10], height 220, padding 28, max 10:
        // y(0) = 220 - 28 - 0 = 192, y(10) = 220 - 28 - 164 = 28.
        let s = series(vec![0, 5, 10], vec![0, 0, 0]);
        let projection = project(&s, 600.0, 220.0, 28.0);

        assert_eq!(projection.attempts[0].y, 192.0);
        assert_eq!(projection.attempts[2].y, 28.0);
        assert!(projection.attempts[0].y > projection.attempts[1].y);
    }

    #[test]
    fn test_x_spread_across_plot_width() {
        let s = series(vec![1, 2, 3], vec![0, 0, 0]);
        let projection = project(&s, 600.0, 220.0, 28.0);

        assert_eq!(projection.attempts[0].x, 28.0);
        assert_eq!(projection.attempts[2].x, 572.0);
        assert_eq!(projection.attempts[1].x, 300.0);
    }

    #[test]
    fn test_all_zero_series_maps_to_baseline() {
        let s = series(vec![0, 0, 0], vec![0, 0, 0]);
        let projection = project(&s, 600.0, 220.0, 28.0);
        for point in projection.attempts.iter().chain(projection.reviews.iter()) {
            assert_eq!(point.y, 192.0);
        }
    }

    #[test]
    fn test_scale_shared_between_lines() {
        let s = series(vec![0, 10], vec![0, 5]);
        let projection = project(&s, 600.0, 220.0, 28.0);
        // reviews peak is half the shared max, so it sits halfway up.
        assert_eq!(projection.attempts[1].y, 28.0);
        assert_eq!(projection.reviews[1].y, 110.0);
    }

    #[test]
    fn test_single_point_series() {
        let s = series(vec![3], vec![1]);
        let projection = project(&s, 600.0, 220.0, 28.0);
        assert_eq!(projection.attempts.len(), 1);
        assert_eq!(projection.attempts[0].x, 28.0);
    }
}
