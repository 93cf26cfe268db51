//! Moving-average time series model
//!
//! Projects a flat point forecast from the trailing window mean, with a
//! confidence interval sized by the sample standard deviation of that window.

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{TimeSeriesEstimate, TimeSeriesPoint};

/// Trailing window length in days
pub const DEFAULT_WINDOW: usize = 30;

/// Moving-average forecaster over a daily net cash flow series
pub struct MovingAverageForecaster {
    window: usize,
    confidence_level: f64,
}

impl MovingAverageForecaster {
    pub fn new(confidence_level: f64) -> Self {
        Self {
            window: DEFAULT_WINDOW,
            confidence_level,
        }
    }

    pub fn with_window(window: usize, confidence_level: f64) -> Self {
        Self {
            window,
            confidence_level,
        }
    }

    /// Z-score for the configured confidence level.
    ///
    /// Unrecognized levels fall back to the 95% z-score.
    fn z_score(&self) -> f64 {
        if self.confidence_level >= 0.99 {
            2.576
        } else if self.confidence_level >= 0.95 {
            1.96
        } else if self.confidence_level >= 0.90 {
            1.645
        } else if self.confidence_level >= 0.80 {
            1.282
        } else {
            1.96
        }
    }

    /// Forecast `days` consecutive days starting at `start`.
    ///
    /// The point estimate is the mean of the last `window` values; the
    /// interval half-width is `z * stddev / sqrt(window)` with the sample
    /// standard deviation taken over the full series, identical for every
    /// day of the horizon.
    pub fn forecast(
        &self,
        series: &[TimeSeriesPoint],
        start: NaiveDate,
        days: i64,
    ) -> Result<Vec<TimeSeriesEstimate>> {
        if series.len() < self.window {
            return Err(Error::InsufficientHistory {
                required: self.window,
                available: series.len(),
            });
        }

        let window = &series[series.len() - self.window..];
        let mean = window.iter().map(|p| p.value).sum::<f64>() / self.window as f64;

        let series_mean = series.iter().map(|p| p.value).sum::<f64>() / series.len() as f64;
        let stddev = sample_stddev(series, series_mean);
        let half_width = self.z_score() * stddev / (self.window as f64).sqrt();

        let estimates = (0..days)
            .map(|offset| {
                let date = start + Duration::days(offset);
                TimeSeriesEstimate {
                    date,
                    value: mean,
                    confidence_low: mean - half_width,
                    confidence_high: mean + half_width,
                }
            })
            .collect();

        Ok(estimates)
    }
}

/// Sample standard deviation (n - 1 denominator); zero when n < 2
fn sample_stddev(points: &[TimeSeriesPoint], mean: f64) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let variance = points
        .iter()
        .map(|p| (p.value - mean).powi(2))
        .sum::<f64>()
        / (points.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_of(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TimeSeriesPoint {
                date: start + Duration::days(i as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn test_short_history_is_rejected() {
        let forecaster = MovingAverageForecaster::new(0.95);
        let err = forecaster
            .forecast(
                &series_of(&[1.0; 10]),
                NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                7,
            )
            .unwrap_err();

        match err {
            Error::InsufficientHistory {
                required,
                available,
            } => {
                assert_eq!(required, DEFAULT_WINDOW);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_constant_series_has_degenerate_interval() {
        let forecaster = MovingAverageForecaster::new(0.95);
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let estimates = forecaster
            .forecast(&series_of(&[-25.0; 40]), start, 5)
            .unwrap();

        assert_eq!(estimates.len(), 5);
        assert_eq!(estimates[0].date, start);
        assert_eq!(estimates[4].date, start + Duration::days(4));
        for est in &estimates {
            assert!((est.value + 25.0).abs() < 1e-9);
            assert!((est.confidence_low - est.value).abs() < 1e-9);
            assert!((est.confidence_high - est.value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_only_trailing_window_contributes() {
        // 30 old days at 100 followed by 30 recent days at -10: only the
        // recent window should drive the point estimate.
        let mut values = vec![100.0; 30];
        values.extend(vec![-10.0; 30]);

        let forecaster = MovingAverageForecaster::new(0.95);
        let estimates = forecaster
            .forecast(
                &series_of(&values),
                NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                1,
            )
            .unwrap();

        assert!((estimates[0].value + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_higher_confidence_widens_interval() {
        let mut values = vec![0.0; 30];
        // Alternate so the window has real variance
        for (i, v) in values.iter_mut().enumerate() {
            *v = if i % 2 == 0 { 50.0 } else { -50.0 };
        }
        let series = series_of(&values);
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        let narrow = MovingAverageForecaster::new(0.80)
            .forecast(&series, start, 1)
            .unwrap();
        let wide = MovingAverageForecaster::new(0.99)
            .forecast(&series, start, 1)
            .unwrap();

        let narrow_width = narrow[0].confidence_high - narrow[0].confidence_low;
        let wide_width = wide[0].confidence_high - wide[0].confidence_low;
        assert!(wide_width > narrow_width);
        assert!(narrow_width > 0.0);
    }
}
