use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumIter, EnumString};

pub const TEMPERATURE_MIN: u8 = 18;
pub const TEMPERATURE_MAX: u8 = 30;

/// Operating mode of the unit.
///
/// Unknown codes and names resolve to [AcMode::Auto].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AcMode {
    #[default]
    Auto,
    Dry,
    Cool,
    Heat,
    Fan
}

impl AcMode {
    /// 4 bit code carried in the high nybble of the mode/power byte
    pub fn code(self) -> u8 {
        match self {
            AcMode::Auto => 0x0,
            AcMode::Dry => 0x2,
            AcMode::Cool => 0x3,
            AcMode::Heat => 0x4,
            AcMode::Fan => 0x6,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x2 => AcMode::Dry,
            0x3 => AcMode::Cool,
            0x4 => AcMode::Heat,
            0x6 => AcMode::Fan,
            _ => AcMode::Auto,
        }
    }

    pub fn from_name(name: &str) -> Self {
        AcMode::from_str(name).unwrap_or_default()
    }
}

/// Fan speed setting.
///
/// The manual speeds persist as `ONE` through `FIVE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum FanMode {
    #[default]
    #[strum(serialize = "AUTO")]
    Auto,
    #[strum(serialize = "SILENT")]
    Silent,
    #[strum(serialize = "ONE")]
    Speed1,
    #[strum(serialize = "TWO")]
    Speed2,
    #[strum(serialize = "THREE")]
    Speed3,
    #[strum(serialize = "FOUR")]
    Speed4,
    #[strum(serialize = "FIVE")]
    Speed5
}

impl FanMode {
    /// 4 bit code carried in the high nybble of the fan/swing byte
    pub fn code(self) -> u8 {
        match self {
            FanMode::Auto => 0xa,
            FanMode::Silent => 0xb,
            FanMode::Speed1 => 0x3,
            FanMode::Speed2 => 0x4,
            FanMode::Speed3 => 0x5,
            FanMode::Speed4 => 0x6,
            FanMode::Speed5 => 0x7,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0xb => FanMode::Silent,
            0x3 => FanMode::Speed1,
            0x4 => FanMode::Speed2,
            0x5 => FanMode::Speed3,
            0x6 => FanMode::Speed4,
            0x7 => FanMode::Speed5,
            _ => FanMode::Auto,
        }
    }

    pub fn from_name(name: &str) -> Self {
        FanMode::from_str(name).unwrap_or_default()
    }
}

fn serialize_name<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl Serialize for AcMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_name(self, serializer)
    }
}

impl<'de> Deserialize<'de> for AcMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(AcMode::from_name(&name))
    }
}

impl Serialize for FanMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_name(self, serializer)
    }
}

impl<'de> Deserialize<'de> for FanMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(FanMode::from_name(&name))
    }
}

/// On/off timer.
///
/// `SetOn` delays the unit turning on, `SetOff` delays it turning off.
/// Experimental: only the frame encoding is known, timers are never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerMode {
    SetOn,
    SetOff,
    #[default]
    SetNone
}

/// Setpoint temperature in whole degrees celsius, always within 18..=30.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(u8);

impl Temperature {
    /// Clamp `degrees` into range.
    pub fn clamped(degrees: i32) -> Self {
        Self(degrees.clamp(TEMPERATURE_MIN as i32, TEMPERATURE_MAX as i32) as u8)
    }

    pub fn celsius(self) -> u8 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(19)
    }
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Whole or fractional, truncated toward zero. The cast saturates.
        let degrees = f64::deserialize(deserializer)?;
        Ok(Self::clamped(degrees.trunc() as i32))
    }
}

/// Desired settings of the unit.
///
/// Setters never fail: out of range temperatures are clamped and unknown
/// mode names fall back to `AUTO`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub power: bool,

    temperature: Temperature,

    pub ac_mode: AcMode,

    pub fan_mode: FanMode,

    pub swing_vertical: bool,

    pub swing_horizontal: bool,

    pub economy: bool,

    pub comfort: bool,

    pub powerful: bool,

    #[serde(skip)]
    timer: TimerMode,

    #[serde(skip)]
    timer_duration_minutes: u16,
}

impl ControlState {
    pub fn new(power: bool, temperature: i32, ac_mode: AcMode, fan_mode: FanMode) -> Self {
        Self {
            power,
            temperature: Temperature::clamped(temperature),
            ac_mode,
            fan_mode,
            ..Default::default()
        }
    }

    pub fn temperature(&self) -> u8 {
        self.temperature.celsius()
    }

    /// Set the temperature, returning `true` if it had to be clamped.
    pub fn set_temperature(&mut self, degrees: i32) -> bool {
        self.temperature = Temperature::clamped(degrees);

        self.temperature.celsius() as i32 != degrees
    }

    pub fn timer(&self) -> TimerMode {
        self.timer
    }

    pub fn timer_duration_minutes(&self) -> u16 {
        self.timer_duration_minutes
    }

    pub fn set_timer(&mut self, mode: TimerMode, hours: u8) {
        self.timer = mode;
        self.timer_duration_minutes = match mode {
            TimerMode::SetNone => 0,
            _ => hours as u16 * 60,
        };
    }

    pub fn clear_timer(&mut self) {
        self.set_timer(TimerMode::SetNone, 0)
    }
}
