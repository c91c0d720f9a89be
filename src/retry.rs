//! Bounded retries for peripheral reads

use crate::error::HardwareFault;

/// Conversion attempts before an ADC read gives up.
pub const ADC_ATTEMPTS: u8 = 3;

/// Run `attempt` up to `attempts` times and return the first success.
///
/// Each attempt is expected to carry its own timeout. When every attempt
/// fails, `fault` is returned.
pub async fn bounded<T, E>(
    attempts: u8,
    fault: HardwareFault,
    mut attempt: impl AsyncFnMut() -> Result<T, E>,
) -> Result<T, HardwareFault> {
    for n in 1..=attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(_) => debug!("attempt {}/{} failed", n, attempts),
        }
    }
    debug!("giving up after {} attempts: {:?}", attempts, fault);
    Err(fault)
}
