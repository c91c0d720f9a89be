//! ADC sampling of the potentiometer and the internal temperature sensor
//!
//! Conversions are attempted a bounded number of times, each with a timeout.
//! Running out of attempts is reported as [`HardwareFault::AdcTimeout`]
//! instead of waiting forever.

use calendar_clock::HardwareFault;
use calendar_clock::retry::{self, ADC_ATTEMPTS};
use embassy_stm32::adc::{Adc, AdcChannel, SampleTime, Temperature};
use embassy_stm32::peripherals::ADC1;
use embassy_time::{Duration, with_timeout};

/// Time allowed for one conversion.
pub const ADC_TIMEOUT: Duration = Duration::from_millis(2);

pub struct Sampler<'d, P> {
    adc: Adc<'d, ADC1>,
    temperature: Temperature,
    dial: P,
}

impl<'d, P: AdcChannel<ADC1>> Sampler<'d, P> {
    pub fn new(mut adc: Adc<'d, ADC1>, dial: P) -> Self {
        // The temperature sensor needs at least 17.1 us of sampling.
        adc.set_sample_time(SampleTime::CYCLES239_5);
        let temperature = adc.enable_temperature();
        Self {
            adc,
            temperature,
            dial,
        }
    }

    /// Potentiometer position, 0..=4095.
    pub async fn dial(&mut self) -> Result<u16, HardwareFault> {
        read_bounded(&mut self.adc, &mut self.dial).await
    }

    /// Raw temperature sensor reading.
    pub async fn temperature(&mut self) -> Result<u16, HardwareFault> {
        read_bounded(&mut self.adc, &mut self.temperature).await
    }
}

async fn read_bounded(
    adc: &mut Adc<'_, ADC1>,
    channel: &mut impl AdcChannel<ADC1>,
) -> Result<u16, HardwareFault> {
    let convert = async || with_timeout(ADC_TIMEOUT, adc.read(channel)).await;
    retry::bounded(ADC_ATTEMPTS, HardwareFault::AdcTimeout, convert).await
}
