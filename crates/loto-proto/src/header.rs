//! Frame header implementation with zero-copy parsing.
//!
//! The header is a fixed 5-byte structure, serialized big-endian, matching
//! `spec.md` §6 bit-for-bit: a 4-byte body length followed by a 1-byte
//! message type tag. No magic number or version byte is reserved — the wire
//! format has no room for one.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::ProtocolError;

/// Fixed 5-byte frame header (big-endian network byte order).
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    body_length: [u8; 4],
    message_type: u8,
}

impl FrameHeader {
    /// Size of the serialized header (5 bytes).
    pub const SIZE: usize = 5;

    /// Per `spec.md` §6, the frame ceiling on body length.
    pub const MAX_BODY_LEN: u32 = 8 * 1024;

    /// Build a header for a body of `body_length` bytes and the given type
    /// tag. Does not itself enforce the ceiling; callers validate before
    /// constructing (see `Frame::new`).
    #[must_use]
    pub fn new(body_length: u32, message_type: u8) -> Self {
        Self { body_length: body_length.to_be_bytes(), message_type }
    }

    /// Parse a header from the first [`Self::SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FrameTooShort`] if fewer than [`Self::SIZE`]
    /// bytes are available, or [`ProtocolError::BodyTooLarge`] if the
    /// declared length exceeds [`Self::MAX_BODY_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        let len = header.body_length();
        if len > Self::MAX_BODY_LEN {
            return Err(ProtocolError::BodyTooLarge {
                size: len as usize,
                max: Self::MAX_BODY_LEN as usize,
            });
        }

        Ok(*header)
    }

    /// Serialize the header to its 5-byte wire form.
    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(&self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Declared body length in bytes.
    #[must_use]
    pub fn body_length(&self) -> u32 {
        u32::from_be_bytes(self.body_length)
    }

    /// Raw message type tag; unknown tags are preserved, not rejected here
    /// (dispatch on unknown tags is the session handler's job, per
    /// `spec.md` §4.A).
    #[must_use]
    pub fn message_type_tag(&self) -> u8 {
        self.message_type
    }
}

impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("body_length", &self.body_length())
            .field("message_type", &self.message_type_tag())
            .finish()
    }
}

impl PartialEq for FrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FrameHeader {}
