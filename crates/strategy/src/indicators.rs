use ta::indicators::StandardDeviation;
use ta::{Close, Next, Reset};

use common::SignalError;
use common::config::{BAND_DEVIATIONS, BAND_WINDOW, EMA_WINDOW};
use common::models::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub ema_window: usize,
    pub band_window: usize,
    pub band_deviations: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_window: EMA_WINDOW,
            band_window: BAND_WINDOW,
            band_deviations: BAND_DEVIATIONS,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.ema_window == 0 {
            return Err(SignalError::InvalidParameter(
                "ema window must be positive".to_string(),
            ));
        }
        // Sample deviation needs at least two points.
        if self.band_window < 2 {
            return Err(SignalError::InvalidParameter(
                "band window must be at least 2".to_string(),
            ));
        }
        if !self.band_deviations.is_finite() || self.band_deviations < 0.0 {
            return Err(SignalError::InvalidParameter(format!(
                "band deviations must be a non-negative number, got {}",
                self.band_deviations
            )));
        }
        Ok(())
    }

    /// Number of closes before the first snapshot is defined.
    pub fn required_history(&self) -> usize {
        self.ema_window.max(self.band_window)
    }
}

/// Trailing mean over a fixed window, updated incrementally.
///
/// The mean moves by `(new - old) / n` instead of dividing a running sum, so a
/// constant input yields that exact value at every position.
#[derive(Debug, Clone)]
struct RollingMean {
    window: Box<[f64]>,
    index: usize,
    count: usize,
    mean: f64,
}

impl RollingMean {
    fn new(period: usize) -> Self {
        Self {
            window: vec![0.0; period].into_boxed_slice(),
            index: 0,
            count: 0,
            mean: 0.0,
        }
    }
}

impl Next<f64> for RollingMean {
    type Output = f64;

    fn next(&mut self, input: f64) -> f64 {
        let period = self.window.len();
        let old = std::mem::replace(&mut self.window[self.index], input);
        self.index = (self.index + 1) % period;

        if self.count < period {
            self.count += 1;
            self.mean += (input - self.mean) / self.count as f64;
        } else {
            self.mean += (input - old) / period as f64;
        }
        self.mean
    }
}

impl Reset for RollingMean {
    fn reset(&mut self) {
        self.window.fill(0.0);
        self.index = 0;
        self.count = 0;
        self.mean = 0.0;
    }
}

/// Streaming EMA + moving-average band over a close series.
///
/// The EMA is seeded with the simple average of the first `ema_window` closes
/// and then follows `ema += alpha * (close - ema)` with `alpha = 2 / (window + 1)`.
/// The band is centered on the trailing SMA and is `band_deviations` sample
/// standard deviations wide on each side.
#[derive(Debug, Clone)]
pub struct IndicatorState {
    params: IndicatorParams,
    alpha: f64,
    seen: usize,
    ema_seed: RollingMean,
    ema: Option<f64>,
    band_mean: RollingMean,
    band_sd: StandardDeviation,
    // ta's deviation divides by n; rescale to the n - 1 estimator.
    sample_correction: f64,
}

impl IndicatorState {
    pub fn new(params: IndicatorParams) -> Result<Self, SignalError> {
        params.validate()?;

        let ta_err = |e: ta::errors::TaError| SignalError::InvalidParameter(format!("{e:?}"));
        let n = params.band_window as f64;

        Ok(Self {
            params,
            alpha: 2.0 / (params.ema_window as f64 + 1.0),
            seen: 0,
            ema_seed: RollingMean::new(params.ema_window),
            ema: None,
            band_mean: RollingMean::new(params.band_window),
            band_sd: StandardDeviation::new(params.band_window).map_err(ta_err)?,
            sample_correction: (n / (n - 1.0)).sqrt(),
        })
    }

    fn next_ema(&mut self, close: f64) -> Option<f64> {
        let ema = match self.ema {
            Some(prev) => Some(prev + self.alpha * (close - prev)),
            None => {
                let seed = self.ema_seed.next(close);
                (self.seen >= self.params.ema_window).then_some(seed)
            }
        };
        self.ema = ema;
        ema
    }
}

impl Next<f64> for IndicatorState {
    type Output = Option<IndicatorSnapshot>;

    fn next(&mut self, close: f64) -> Self::Output {
        self.seen += 1;

        let ema = self.next_ema(close);
        let center = self.band_mean.next(close);
        let deviation = self.band_sd.next(close) * self.sample_correction;

        if self.seen < self.params.band_window {
            return None;
        }

        let width = self.params.band_deviations * deviation;
        ema.map(|ema| IndicatorSnapshot {
            ema,
            band_center: center,
            band_upper: center + width,
            band_lower: center - width,
            close,
        })
    }
}

impl<T: Close> Next<&T> for IndicatorState {
    type Output = Option<IndicatorSnapshot>;

    fn next(&mut self, input: &T) -> Self::Output {
        Next::<f64>::next(self, input.close())
    }
}

impl Reset for IndicatorState {
    fn reset(&mut self) {
        self.seen = 0;
        self.ema = None;
        self.ema_seed.reset();
        self.band_mean.reset();
        self.band_sd.reset();
    }
}

/// Batch form of [`IndicatorState`]: one output slot per input close.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Result<Self, SignalError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn state(&self) -> Result<IndicatorState, SignalError> {
        IndicatorState::new(self.params)
    }

    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<IndicatorSnapshot>>, SignalError> {
        let mut state = self.state()?;
        Ok(closes.iter().map(|&close| state.next(close)).collect())
    }

    /// Snapshots at the last two positions, both of which must be defined.
    pub fn latest_two(
        &self,
        closes: &[f64],
    ) -> Result<(IndicatorSnapshot, IndicatorSnapshot), SignalError> {
        let required = self.params.required_history() + 1;
        let insufficient = SignalError::InsufficientHistory {
            required,
            available: closes.len(),
        };

        let snapshots = self.compute(closes)?;
        match snapshots.as_slice() {
            [.., Some(previous), Some(latest)] => Ok((*latest, *previous)),
            _ => Err(insufficient),
        }
    }
}
