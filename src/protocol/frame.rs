use packed_struct::{PackedStruct, PackingError};
use thiserror::Error;

use super::messages::Message;


/// Every frame starts with these bytes
pub const HEADER: [u8; 4] = [0x11, 0xda, 0x27, 0x00];

const MESSAGE_ID_INDEX: usize = 4;


pub trait Checksum {
    fn checksum(&mut self) -> u8;
}

impl <'a>Checksum for std::slice::Iter<'a, u8> {
    fn checksum(&mut self) -> u8 {
        self.fold(0, |acc, byte| acc.wrapping_add(*byte))
    }
}


#[derive(Error, Debug)]
pub enum FrameError {
    #[error("invalid frame length (expected {expected}, actual: {actual})")]
    InvalidLength {
        expected: usize,
        actual: usize
    },
    #[error("invalid frame header {0:02x?}")]
    InvalidHeader([u8; 4]),
    #[error("unexpected message id (expected {expected:02x}, actual: {actual:02x})")]
    UnexpectedMessageId {
        expected: u8,
        actual: u8
    },
    #[error("invalid checksum (expected {expected:02x}, actual: {actual:02x})")]
    InvalidChecksum {
        expected: u8,
        actual: u8
    },
    #[error("fixed field {field} has unexpected value {value:02x}")]
    InvalidFixedField {
        field: &'static str,
        value: u8
    },
    #[error("failed to pack message: {0}")]
    Packing(#[from] PackingError),
}


/// A complete frame of `S` bytes: header, message id, body and checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<const S: usize> {
    data: [u8; S]
}

impl<const S: usize> Frame<S> {
    pub const SIZE: usize = S;

    /// Pack a `Message` `PackedStruct` into a new `Frame` of the appropriate size,
    /// filling in the header, message id and checksum.
    pub fn pack<T>(message: &T) -> Result<Self, FrameError> where
        T: PackedStruct<ByteArray = [u8; S]> + Message
    {
        message.check()?;

        let mut data = message.pack()?;

        data[..HEADER.len()].copy_from_slice(&HEADER);
        data[MESSAGE_ID_INDEX] = T::ID;
        data[S - 1] = data[..S - 1].iter().checksum();

        Ok(Self { data })
    }

    /// Validate raw bytes as a frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let data: [u8; S] = bytes.try_into()
            .map_err(|_| FrameError::InvalidLength { expected: S, actual: bytes.len() })?;

        let mut header = [0; 4];
        header.copy_from_slice(&data[..HEADER.len()]);
        if header != HEADER {
            return Err(FrameError::InvalidHeader(header));
        }

        let expected = data[..S - 1].iter().checksum();
        let actual = data[S - 1];
        if expected != actual {
            return Err(FrameError::InvalidChecksum { expected, actual });
        }

        Ok(Self { data })
    }

    /// Unpack `Self` as a `Message` `PackedStruct`
    pub fn unpack_as<T>(&self) -> Result<T, FrameError> where
        T: PackedStruct<ByteArray = [u8; S]> + Message
    {
        if self.message_id() != T::ID {
            return Err(FrameError::UnexpectedMessageId { expected: T::ID, actual: self.message_id() });
        }

        let message = T::unpack(&self.data)?;
        message.check()?;

        Ok(message)
    }

    pub fn message_id(&self) -> u8 {
        self.data[MESSAGE_ID_INDEX]
    }

    pub fn checksum(&self) -> u8 {
        self.data[S - 1]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }
}

impl<const S: usize> AsRef<[u8]> for Frame<S> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

pub type ShortFrame = Frame<8>;
pub type LongFrame = Frame<19>;


/// The three frames sent, in order, for a single button press on the remote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frames {
    /// Message `0xc5`, carries comfort mode
    pub one: ShortFrame,

    /// Message `0x42`, never changes
    pub two: ShortFrame,

    /// Message `0x00`, carries everything else
    pub three: LongFrame,
}

impl Frames {
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        [self.one.as_bytes(), self.two.as_bytes(), self.three.as_bytes()].into_iter()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        let frame: [u8; 7] = [0x11, 0xda, 0x27, 0x00, 0xc5, 0x00, 0x00];
        assert_eq!(frame.iter().checksum(), 0xd7);

        assert_eq!([0xffu8, 0x02].iter().checksum(), 0x01);
        assert_eq!([0u8; 0].iter().checksum(), 0x00);
    }

    #[test]
    fn test_from_bytes() {
        let valid: [u8; 8] = [0x11, 0xda, 0x27, 0x00, 0x42, 0x00, 0x00, 0x54];
        let frame = ShortFrame::from_bytes(&valid).expect("valid frame");
        assert_eq!(frame.message_id(), 0x42);
        assert_eq!(frame.checksum(), 0x54);

        let mut corrupted = valid;
        corrupted[5] = 0x01;
        assert!(matches!(
            ShortFrame::from_bytes(&corrupted),
            Err(FrameError::InvalidChecksum { expected: 0x55, actual: 0x54 })
        ));

        let mut bad_header = valid;
        bad_header[1] = 0xdb;
        bad_header[7] = 0x55;
        assert!(matches!(ShortFrame::from_bytes(&bad_header), Err(FrameError::InvalidHeader(_))));

        assert!(matches!(
            LongFrame::from_bytes(&valid),
            Err(FrameError::InvalidLength { expected: 19, actual: 8 })
        ));
    }
}
