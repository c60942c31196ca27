use packed_struct::prelude::*;

use super::frame::{FrameError, Frames, LongFrame, ShortFrame};
use super::state::{AcMode, ControlState, FanMode, TimerMode};

/*
    Frame layout (all frames):

    [0x11, 0xda, 0x27, 0x00] header
    [id]                     message id
    [...]                    body
    [checksum]               8 bit sum of all preceding bytes

    A button press on the remote sends 0xc5, 0x42 and 0x00 in that order.
*/

pub trait Message {
    const ID: u8;

    fn check(&self) -> Result<(), FrameError> {
        // default checks nothing
        Ok(())
    }
}


mod msg_c5 {
    use super::*;

    /// Message `0xc5` -- first frame.
    ///
    /// Only carries the comfort (draught prevention) flag.
    #[derive(PackedStruct, Debug, Default, Clone, PartialEq)]
    #[packed_struct(bit_numbering="msb0", size_bytes="8")]
    pub struct MessageC5 {
        // byte 6

        #[packed_field(bits="51")]
        pub comfort: bool,
    }

    impl Message for MessageC5 {
        const ID: u8 = 0xc5;
    }

    impl From<&ControlState> for MessageC5 {
        fn from(state: &ControlState) -> Self {
            Self {
                comfort: state.comfort
            }
        }
    }
}

pub use msg_c5::MessageC5;


mod msg_42 {
    use super::*;

    /// Message `0x42` -- second frame.
    ///
    /// The body is always empty.
    #[derive(PackedStruct, Debug, Default, Clone, PartialEq)]
    #[packed_struct(bit_numbering="msb0", size_bytes="8")]
    pub struct Message42 {
        #[packed_field(bytes="5..=6")]
        _empty: [u8; 2]
    }

    impl Message for Message42 {
        const ID: u8 = 0x42;

        fn check(&self) -> Result<(), FrameError> {
            match self._empty.iter().find(|byte| **byte != 0x00) {
                Some(value) => Err(FrameError::InvalidFixedField { field: "empty", value: *value }),
                None => Ok(())
            }
        }
    }
}

pub use msg_42::Message42;


mod msg_00 {
    use super::*;

    const FIXED_BYTE15: u8 = 0xc1;

    /// Message `0x00` -- third frame.
    ///
    /// Carries the full state of the remote.
    #[derive(PackedStruct, Debug, Clone, PartialEq)]
    #[packed_struct(bit_numbering="msb0", size_bytes="19")]
    pub struct Message00 {
        // byte 5

        /// `AcMode` code
        #[packed_field(bits="40:43")]
        pub mode: u8,

        /// Always set.
        #[packed_field(bits="44")]
        pub fixed_bit44: bool,

        /// Timer is counting down to turning the unit off
        #[packed_field(bits="45")]
        pub timer_off: bool,

        /// Timer is counting down to turning the unit on
        #[packed_field(bits="46")]
        pub timer_on: bool,

        #[packed_field(bits="47")]
        pub power: bool,

        // byte 6

        /// Setpoint in whole degrees
        #[packed_field(bits="48:54")]
        pub temperature: u8,

        /// Never set by this remote.
        #[packed_field(bits="55")]
        pub half_degree: bool,

        // byte 8

        /// `FanMode` code
        #[packed_field(bits="64:67")]
        pub fan: u8,

        #[packed_field(bits="71")]
        pub swing_horizontal: bool,

        // byte 9

        #[packed_field(bits="79")]
        pub swing_vertical: bool,

        // bytes 10-12
        // on timer uses a and b, off timer uses b and c

        #[packed_field(bytes="10")]
        pub timer_a: u8,

        #[packed_field(bytes="11")]
        pub timer_b: u8,

        #[packed_field(bytes="12")]
        pub timer_c: u8,

        // byte 13

        #[packed_field(bits="111")]
        pub powerful: bool,

        #[packed_field(bytes="15")]
        pub unknown_byte15: u8,

        // byte 16

        /// Always set.
        #[packed_field(bits="128")]
        pub fixed_bit128: bool,

        #[packed_field(bits="133")]
        pub economy: bool,
    }

    impl Message for Message00 {
        const ID: u8 = 0x00;

        fn check(&self) -> Result<(), FrameError> {
            if !self.fixed_bit44 {
                return Err(FrameError::InvalidFixedField { field: "byte 5 bit 3", value: 0x00 });
            }

            if self.unknown_byte15 != FIXED_BYTE15 {
                return Err(FrameError::InvalidFixedField { field: "byte 15", value: self.unknown_byte15 });
            }

            if !self.fixed_bit128 {
                return Err(FrameError::InvalidFixedField { field: "byte 16 bit 7", value: 0x00 });
            }

            Ok(())
        }
    }

    /// Encode the timer into bytes a, b and c.
    ///
    /// Not completely understood: b and c always carry `0x06`/`0x60`
    /// unless a duration overwrites them.
    fn timer_bytes(timer: TimerMode, minutes: u16) -> (u8, u8, u8) {
        let (mut a, mut b, mut c) = (0x00, 0x06, 0x60);

        match timer {
            TimerMode::SetOff => {
                if minutes > 0xff {
                    c = (minutes >> 8) as u8;
                    b = (minutes & 0xff) as u8;
                } else {
                    c = (minutes >> 4) as u8;
                    b |= ((minutes & 0x0f) << 4) as u8;
                }
            },
            TimerMode::SetOn => {
                a = (minutes & 0xff) as u8;
                b = ((minutes >> 8) & 0xff) as u8;
            },
            TimerMode::SetNone => ()
        }

        (a, b, c)
    }

    impl From<&ControlState> for Message00 {
        fn from(state: &ControlState) -> Self {
            let (timer_a, timer_b, timer_c) = timer_bytes(state.timer(), state.timer_duration_minutes());

            Self {
                mode: state.ac_mode.code(),
                fixed_bit44: true,
                timer_off: state.timer() == TimerMode::SetOff,
                timer_on: state.timer() == TimerMode::SetOn,
                power: state.power,
                temperature: state.temperature(),
                half_degree: false,
                fan: state.fan_mode.code(),
                swing_horizontal: state.swing_horizontal,
                swing_vertical: state.swing_vertical,
                timer_a,
                timer_b,
                timer_c,
                powerful: state.powerful,
                unknown_byte15: FIXED_BYTE15,
                fixed_bit128: true,
                economy: state.economy,
            }
        }
    }

    impl Message00 {
        pub fn ac_mode(&self) -> AcMode {
            AcMode::from_code(self.mode)
        }

        pub fn fan_mode(&self) -> FanMode {
            FanMode::from_code(self.fan)
        }

        pub fn timer_mode(&self) -> TimerMode {
            match (self.timer_on, self.timer_off) {
                (true, _) => TimerMode::SetOn,
                (false, true) => TimerMode::SetOff,
                (false, false) => TimerMode::SetNone,
            }
        }
    }
}

pub use msg_00::Message00;


/// Encode `state` into the three frames of a remote button press.
pub fn encode(state: &ControlState) -> Result<Frames, FrameError> {
    Ok(Frames {
        one: ShortFrame::pack(&MessageC5::from(state))?,
        two: ShortFrame::pack(&Message42::default())?,
        three: LongFrame::pack(&Message00::from(state))?,
    })
}

/// Recover the persisted part of the state from three frames.
///
/// Timer durations are not recovered.
pub fn decode(frames: &Frames) -> Result<ControlState, FrameError> {
    let one = frames.one.unpack_as::<MessageC5>()?;
    frames.two.unpack_as::<Message42>()?;
    let three = frames.three.unpack_as::<Message00>()?;

    let mut state = ControlState::new(three.power, three.temperature as i32, three.ac_mode(), three.fan_mode());
    state.swing_vertical = three.swing_vertical;
    state.swing_horizontal = three.swing_horizontal;
    state.economy = three.economy;
    state.comfort = one.comfort;
    state.powerful = three.powerful;

    Ok(state)
}
