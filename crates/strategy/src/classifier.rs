use ta::{Next, Reset};

use common::SignalError;
use common::models::{IndicatorSnapshot, Signal};

use crate::indicators::{IndicatorParams, IndicatorState};

/// Trend crossings win over band position; all comparisons are strict, so a
/// close sitting exactly on a line falls through to `Neutral`.
pub fn classify(latest: Option<&IndicatorSnapshot>, previous: Option<&IndicatorSnapshot>) -> Signal {
    let (Some(latest), Some(previous)) = (latest, previous) else {
        return Signal::NoData;
    };

    if latest.close > latest.ema && previous.close < previous.ema {
        Signal::StrongBuy
    } else if latest.close < latest.ema && previous.close > previous.ema {
        Signal::StrongSell
    } else if latest.close > latest.band_center && latest.close < latest.band_upper {
        Signal::WeakBuy
    } else if latest.close < latest.band_center && latest.close > latest.band_lower {
        Signal::WeakSell
    } else {
        Signal::Neutral
    }
}

/// Classifies the last two positions of an indicator series.
pub fn classify_series(snapshots: &[Option<IndicatorSnapshot>]) -> Signal {
    match snapshots {
        [.., previous, latest] => classify(latest.as_ref(), previous.as_ref()),
        _ => Signal::NoData,
    }
}

/// Applies [`classify`] to every newly closed candle of an unbounded feed.
#[derive(Debug, Clone)]
pub struct SignalTracker {
    state: IndicatorState,
    previous: Option<IndicatorSnapshot>,
}

impl SignalTracker {
    pub fn new(params: IndicatorParams) -> Result<Self, SignalError> {
        Ok(Self {
            state: IndicatorState::new(params)?,
            previous: None,
        })
    }

    pub fn last_snapshot(&self) -> Option<&IndicatorSnapshot> {
        self.previous.as_ref()
    }
}

impl Next<f64> for SignalTracker {
    type Output = Signal;

    fn next(&mut self, close: f64) -> Self::Output {
        let latest = self.state.next(close);
        let signal = classify(latest.as_ref(), self.previous.as_ref());
        self.previous = latest;
        signal
    }
}

impl Reset for SignalTracker {
    fn reset(&mut self) {
        self.state.reset();
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(close: f64, ema: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema,
            band_center: ema,
            band_upper: ema + 0.02,
            band_lower: ema - 0.02,
            close,
        }
    }

    #[test]
    fn test_missing_snapshot_is_no_data() {
        let s = snapshot(1.0, 1.0);
        assert_eq!(classify(None, Some(&s)), Signal::NoData);
        assert_eq!(classify(Some(&s), None), Signal::NoData);
        assert_eq!(classify(None, None), Signal::NoData);
    }

    #[test]
    fn test_upward_crossing_is_strong_buy() {
        let previous = snapshot(1.0, 1.01);
        let latest = snapshot(1.02, 1.01);
        assert_eq!(classify(Some(&latest), Some(&previous)), Signal::StrongBuy);
    }

    #[test]
    fn test_downward_crossing_is_strong_sell() {
        let previous = snapshot(1.02, 1.01);
        let latest = snapshot(1.0, 1.01);
        assert_eq!(classify(Some(&latest), Some(&previous)), Signal::StrongSell);
    }

    #[test]
    fn test_close_inside_upper_half_of_band_is_weak_buy() {
        let latest = IndicatorSnapshot {
            ema: 1.0,
            band_center: 1.01,
            band_upper: 1.02,
            band_lower: 1.00,
            close: 1.015,
        };
        // Already above the EMA on the previous bar, so no crossing.
        let previous = snapshot(1.01, 1.0);
        assert_eq!(classify(Some(&latest), Some(&previous)), Signal::WeakBuy);
    }

    #[test]
    fn test_close_inside_lower_half_of_band_is_weak_sell() {
        let latest = IndicatorSnapshot {
            ema: 1.02,
            band_center: 1.01,
            band_upper: 1.02,
            band_lower: 1.00,
            close: 1.005,
        };
        let previous = snapshot(1.0, 1.02);
        assert_eq!(classify(Some(&latest), Some(&previous)), Signal::WeakSell);
    }

    #[test]
    fn test_crossing_takes_priority_over_band_position() {
        // Close also lies inside the upper half of the band.
        let latest = IndicatorSnapshot {
            ema: 1.01,
            band_center: 1.0,
            band_upper: 1.05,
            band_lower: 0.95,
            close: 1.02,
        };
        let previous = snapshot(1.0, 1.01);
        assert_eq!(classify(Some(&latest), Some(&previous)), Signal::StrongBuy);
    }

    #[test]
    fn test_exact_equality_falls_through_to_neutral() {
        let on_center = IndicatorSnapshot {
            ema: 1.0,
            band_center: 1.01,
            band_upper: 1.02,
            band_lower: 1.00,
            close: 1.01,
        };
        let previous = snapshot(1.01, 1.0);
        assert_eq!(classify(Some(&on_center), Some(&previous)), Signal::Neutral);

        let outside_band = IndicatorSnapshot {
            close: 1.03,
            ..on_center
        };
        assert_eq!(classify(Some(&outside_band), Some(&previous)), Signal::Neutral);

        let flat = snapshot(1.0, 1.0);
        assert_eq!(classify(Some(&flat), Some(&flat)), Signal::Neutral);
    }

    #[test]
    fn test_classification_is_deterministic_over_a_grid() {
        let values = [0.99, 1.0, 1.005, 1.01, 1.015, 1.02, 1.03];
        for &latest_close in &values {
            for &previous_close in &values {
                for &ema in &values {
                    let latest = IndicatorSnapshot {
                        ema,
                        band_center: 1.01,
                        band_upper: 1.02,
                        band_lower: 1.0,
                        close: latest_close,
                    };
                    let previous = snapshot(previous_close, ema);

                    let first = classify(Some(&latest), Some(&previous));
                    let second = classify(Some(&latest), Some(&previous));
                    assert_eq!(first, second);
                    assert_ne!(first, Signal::NoData);
                }
            }
        }
    }

    #[test]
    fn test_series_uses_last_two_positions() {
        let series = vec![None, Some(snapshot(1.0, 1.01)), Some(snapshot(1.02, 1.01))];
        assert_eq!(classify_series(&series), Signal::StrongBuy);

        assert_eq!(classify_series(&series[..1]), Signal::NoData);
        assert_eq!(classify_series(&series[..2]), Signal::NoData);
        assert_eq!(classify_series(&[]), Signal::NoData);
    }

    #[test]
    fn test_tracker_reports_crossing_as_candles_close() {
        let params = IndicatorParams {
            ema_window: 3,
            band_window: 2,
            band_deviations: 2.0,
        };
        let mut tracker = SignalTracker::new(params).unwrap();

        // EMA: seed 1.0 at the third close, then 0.95, then 1.075.
        let signals: Vec<Signal> = [1.0, 1.0, 1.0, 0.9, 1.2]
            .into_iter()
            .map(|close| tracker.next(close))
            .collect();

        assert_eq!(signals[..3], [Signal::NoData; 3]);
        assert_eq!(signals[4], Signal::StrongBuy);
        assert_eq!(tracker.last_snapshot().map(|s| s.close), Some(1.2));

        tracker.reset();
        assert!(tracker.last_snapshot().is_none());
        assert_eq!(tracker.next(1.0), Signal::NoData);
    }
}
