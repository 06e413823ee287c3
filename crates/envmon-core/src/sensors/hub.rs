use crate::history::TemperatureHistory;

/// Everything the screens read from, owned in one place.
///
/// `environmental` and `power` are the results of the startup probes and
/// never change afterwards. The temperature history is written only by the
/// environment screen.
pub struct SensorHub<E, R, P> {
    pub environmental: Option<E>,
    pub ranger: R,
    pub power: Option<P>,
    pub temperature_history: TemperatureHistory,
}

impl<E, R, P> SensorHub<E, R, P> {
    pub fn new(environmental: Option<E>, ranger: R, power: Option<P>) -> Self {
        Self {
            environmental,
            ranger,
            power,
            temperature_history: TemperatureHistory::new(),
        }
    }
}
