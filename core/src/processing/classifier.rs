use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this charge the device is forced into [`DeviceState::Error`].
pub const CRITICAL_BATTERY_PERCENT: u8 = 10;
/// Below this charge the device drops to [`DeviceState::Blinking`].
pub const LOW_BATTERY_PERCENT: u8 = 30;
/// Link quality above which a healthy device runs [`DeviceState::On`].
pub const SIGNAL_ON_THRESHOLD: u8 = 50;

pub const HOT_THRESHOLD_CELSIUS: f32 = 50.0;
pub const COLD_THRESHOLD_CELSIUS: f32 = 0.0;

/// Operating mode of the motor/indicator, recomputed every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    #[default]
    Off,
    On,
    Blinking,
    Error,
}

impl DeviceState {
    pub fn name(self) -> &'static str {
        match self {
            DeviceState::Off => "OFF",
            DeviceState::On => "ON",
            DeviceState::Blinking => "BLINKING",
            DeviceState::Error => "ERROR",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derives the device state from battery and link quality.
///
/// Rules are evaluated in order and the first match wins, so battery safety
/// always dominates signal quality: battery 25 % with signal 90 % is
/// `Blinking`, not `On`.
pub fn classify(battery_percent: u8, signal_strength: u8) -> DeviceState {
    if battery_percent < CRITICAL_BATTERY_PERCENT {
        DeviceState::Error
    } else if battery_percent < LOW_BATTERY_PERCENT {
        DeviceState::Blinking
    } else if signal_strength > SIGNAL_ON_THRESHOLD {
        DeviceState::On
    } else {
        DeviceState::Off
    }
}

/// Externally supplied readings for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightReadings {
    pub battery_percent: u8,
    pub altitude_m: i16,
    pub signal_strength: u8,
}

/// Per-cycle drone telemetry. The device state has no setter; it is
/// recomputed whenever the readings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Telemetry {
    battery_percent: u8,
    altitude_m: i16,
    signal_strength: u8,
    state: DeviceState,
}

impl Telemetry {
    pub fn new(battery_percent: u8, altitude_m: i16, signal_strength: u8) -> Self {
        let mut telemetry = Self {
            battery_percent,
            altitude_m,
            signal_strength,
            state: DeviceState::Off,
        };
        telemetry.update_device_state();
        telemetry
    }

    pub fn from_readings(readings: FlightReadings) -> Self {
        Self::new(
            readings.battery_percent,
            readings.altitude_m,
            readings.signal_strength,
        )
    }

    /// Replaces the readings and reclassifies.
    pub fn record(&mut self, readings: FlightReadings) -> DeviceState {
        self.battery_percent = readings.battery_percent;
        self.altitude_m = readings.altitude_m;
        self.signal_strength = readings.signal_strength;
        self.update_device_state()
    }

    pub fn update_device_state(&mut self) -> DeviceState {
        self.state = classify(self.battery_percent, self.signal_strength);
        self.state
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn altitude_m(&self) -> i16 {
        self.altitude_m
    }

    pub fn signal_strength(&self) -> u8 {
        self.signal_strength
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

/// Coarse thermal status shown next to each sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureStatus {
    Cold,
    Normal,
    Hot,
}

impl TemperatureStatus {
    pub fn from_celsius(temperature: f32) -> Self {
        if temperature < COLD_THRESHOLD_CELSIUS {
            TemperatureStatus::Cold
        } else if temperature > HOT_THRESHOLD_CELSIUS {
            TemperatureStatus::Hot
        } else {
            TemperatureStatus::Normal
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemperatureStatus::Cold => "COLD",
            TemperatureStatus::Normal => "OK",
            TemperatureStatus::Hot => "HOT",
        }
    }
}
