use std::fmt::Display;

use const_format::concatcp;

// microseconds
pub const PULSE: u32 = 430;
pub const ZERO_GAP: u32 = 430;
pub const ONE_GAP: u32 = 1320;
pub const HEADER_PULSE: u32 = 3440;
pub const HEADER_GAP: u32 = 1720;
pub const SHORT_GAP: u32 = 25000;
pub const LONG_GAP: u32 = 35500;


/// One element of the IR waveform: a pulse (carrier on) followed by a gap (carrier off).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    /// `0` bit
    Zero,

    /// `1` bit
    One,

    /// Start of every frame
    FrameHeader,

    /// After the wake preamble
    ShortGap,

    /// Between frames
    LongGap,

    /// Terminates the last frame, no gap
    Final
}

impl Pulse {
    pub fn bit(set: bool) -> Self {
        if set { Pulse::One } else { Pulse::Zero }
    }

    /// Pulse and gap durations in microseconds
    pub fn durations(self) -> (u32, Option<u32>) {
        match self {
            Pulse::Zero => (PULSE, Some(ZERO_GAP)),
            Pulse::One => (PULSE, Some(ONE_GAP)),
            Pulse::FrameHeader => (HEADER_PULSE, Some(HEADER_GAP)),
            Pulse::ShortGap => (PULSE, Some(SHORT_GAP)),
            Pulse::LongGap => (PULSE, Some(LONG_GAP)),
            Pulse::Final => (PULSE, None),
        }
    }

    /// Durations as written in a raw codes config
    pub fn as_str(self) -> &'static str {
        match self {
            Pulse::Zero => concatcp!(PULSE, " ", ZERO_GAP),
            Pulse::One => concatcp!(PULSE, " ", ONE_GAP),
            Pulse::FrameHeader => concatcp!(HEADER_PULSE, " ", HEADER_GAP),
            Pulse::ShortGap => concatcp!(PULSE, " ", SHORT_GAP),
            Pulse::LongGap => concatcp!(PULSE, " ", LONG_GAP),
            Pulse::Final => concatcp!(PULSE),
        }
    }
}

impl Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Encode a frame as one pulse per bit.
///
/// Bytes go out in order, each least significant bit first.
pub fn encode(frame: &[u8]) -> impl Iterator<Item = Pulse> + '_ {
    frame.iter()
        .flat_map(|byte| (0..8).map(move |bit| Pulse::bit((byte >> bit) & 1 == 1)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lsb_first() {
        use Pulse::*;

        // 0xc5 = 11000101, sent as 10100011
        let pulses: Vec<_> = encode(&[0xc5]).collect();
        assert_eq!(pulses, vec![One, Zero, One, Zero, Zero, Zero, One, One]);

        let lines: Vec<_> = pulses.iter().map(|p| p.to_string()).collect();
        assert_eq!(lines[0], "430 1320");
        assert_eq!(lines[1], "430 430");
    }

    #[test]
    fn test_encode_preserves_byte_order() {
        let pulses: Vec<_> = encode(&[0x01, 0x80]).collect();

        assert_eq!(pulses.len(), 16);
        assert_eq!(pulses[0], Pulse::One);
        assert!(pulses[1..15].iter().all(|p| *p == Pulse::Zero));
        assert_eq!(pulses[15], Pulse::One);
    }

    #[test]
    fn test_strings() {
        assert_eq!(Pulse::FrameHeader.as_str(), "3440 1720");
        assert_eq!(Pulse::ShortGap.as_str(), "430 25000");
        assert_eq!(Pulse::LongGap.as_str(), "430 35500");
        assert_eq!(Pulse::Final.as_str(), "430");
        assert_eq!(Pulse::One.durations(), (430, Some(1320)));
    }
}
