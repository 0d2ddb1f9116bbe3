use crate::Result;

/// Something a gauge can pull one fresh scalar from.
///
/// Implemented once per metric kind by the sampler; closures work too, which
/// keeps tests and ad-hoc gauges cheap to write.
pub trait ValueSource {
    fn produce(&self) -> Result<f64>;
}

impl<F> ValueSource for F
where
    F: Fn() -> Result<f64>,
{
    fn produce(&self) -> Result<f64> {
        self()
    }
}
