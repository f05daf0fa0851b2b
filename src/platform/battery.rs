//! Battery charge via the `battery` crate.

use std::time::Duration;

use battery::units::ratio::percent;
use battery::units::time::second;
use battery::{Manager, State};

use crate::error::Result;

/// One reading of the first battery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    /// Charge in [0, 100]
    pub percent: f64,
    pub charging: bool,
    pub time_to_empty: Option<Duration>,
}

/// Seconds left as a duration; negative counts as zero, non-finite as unknown
fn remaining(secs: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(secs.max(0.0)).ok()
}

pub trait BatterySource {
    fn sample(&mut self) -> Result<BatteryReading>;
}

pub struct SystemBattery {
    manager: Manager,
    battery: battery::Battery,
}

impl SystemBattery {
    /// First battery the OS reports, or `None` on machines without one
    pub fn detect() -> Result<Option<Self>> {
        let manager = Manager::new()?;
        let first = manager.batteries()?.next().transpose()?;
        Ok(first.map(|battery| Self { manager, battery }))
    }
}

impl BatterySource for SystemBattery {
    fn sample(&mut self) -> Result<BatteryReading> {
        self.manager.refresh(&mut self.battery)?;

        let charge = f64::from(self.battery.state_of_charge().get::<percent>());
        Ok(BatteryReading {
            percent: charge.clamp(0.0, 100.0),
            charging: matches!(self.battery.state(), State::Charging | State::Full),
            time_to_empty: self
                .battery
                .time_to_empty()
                .and_then(|t| remaining(t.get::<second>())),
        })
    }
}
