/// Indicator values at one position of a close series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub ema: f64,
    pub band_center: f64,
    pub band_upper: f64,
    pub band_lower: f64,
    pub close: f64,
}
