//! Changes requested of the unit, and the home automation vocabulary they arrive in.

use tracing::debug;

use crate::protocol::state::{AcMode, ControlState, FanMode};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Power(bool),
    Temperature(i32),
    TemperatureUp,
    TemperatureDown,
    Mode(AcMode),
    Fan(FanMode),
    Swing {
        vertical: bool,
        horizontal: bool
    },
    Powerful(bool),
    Economy(bool),
    Comfort(bool),
}

impl Command {
    /// Apply to `state`. Out of range temperatures are clamped.
    pub fn apply(self, state: &mut ControlState) {
        match self {
            Command::Power(on) => state.power = on,
            Command::Temperature(degrees) => {
                if state.set_temperature(degrees) {
                    debug!(requested = degrees, temperature = state.temperature(), "temperature clamped");
                }
            },
            Command::TemperatureUp => {
                state.set_temperature(state.temperature() as i32 + 1);
            },
            Command::TemperatureDown => {
                state.set_temperature(state.temperature() as i32 - 1);
            },
            Command::Mode(mode) => state.ac_mode = mode,
            Command::Fan(fan) => state.fan_mode = fan,
            Command::Swing { vertical, horizontal } => {
                state.swing_vertical = vertical;
                state.swing_horizontal = horizontal;
            },
            Command::Powerful(on) => state.powerful = on,
            Command::Economy(on) => state.economy = on,
            Command::Comfort(on) => state.comfort = on,
        }
    }
}


pub const TEMPERATURE_TOPIC: &str = "temperature/set";
pub const POWER_TOPIC: &str = "power/set";
pub const MODE_TOPIC: &str = "mode/set";
pub const FAN_TOPIC: &str = "fan/set";
pub const SWING_TOPIC: &str = "swing/set";

/// Translate a climate control topic (relative to the device prefix) and payload.
///
/// Unknown topics and unparsable temperatures yield no commands.
pub fn from_topic(topic: &str, payload: &str) -> Vec<Command> {
    match topic {
        TEMPERATURE_TOPIC => temperature(payload).into_iter().collect(),
        POWER_TOPIC => vec![Command::Power(payload.trim() == "on")],
        MODE_TOPIC => mode(payload),
        FAN_TOPIC => vec![fan(payload)],
        SWING_TOPIC => vec![swing(payload)],
        _ => {
            debug!(topic, payload, "unknown topic");
            vec![]
        }
    }
}

/// `"21.5"` sets 21 degrees.
pub fn temperature(payload: &str) -> Option<Command> {
    payload.trim().parse::<f64>().ok()
        .filter(|degrees| degrees.is_finite())
        .map(|degrees| Command::Temperature(degrees.trunc() as i32))
}

/// `off` powers the unit down, any other payload powers it up in that mode.
pub fn mode(payload: &str) -> Vec<Command> {
    let mode = match payload.trim() {
        "off" => return vec![Command::Power(false)],
        "dry" => AcMode::Dry,
        "cool" => AcMode::Cool,
        "heat" => AcMode::Heat,
        "fan" | "fan_only" => AcMode::Fan,
        _ => AcMode::Auto,
    };

    vec![Command::Power(true), Command::Mode(mode)]
}

pub fn fan(payload: &str) -> Command {
    Command::Fan(match payload.trim() {
        "low" => FanMode::Speed1,
        "medium" => FanMode::Speed3,
        "high" => FanMode::Speed5,
        "silent" => FanMode::Silent,
        _ => FanMode::Auto,
    })
}

pub fn swing(payload: &str) -> Command {
    let payload = payload.trim();

    Command::Swing {
        vertical: matches!(payload, "both" | "vertical"),
        horizontal: matches!(payload, "both" | "horizontal"),
    }
}


/// Heat to `degrees`, everything else default.
pub fn heat(degrees: i32) -> ControlState {
    ControlState::new(true, degrees, AcMode::Heat, FanMode::Auto)
}

/// Cool to `degrees`, everything else default.
pub fn cool(degrees: i32) -> ControlState {
    ControlState::new(true, degrees, AcMode::Cool, FanMode::Auto)
}

/// Warm the room quickly.
pub fn morning() -> ControlState {
    let mut state = heat(21);
    state.powerful = true;
    state
}
