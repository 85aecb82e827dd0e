//! Wire framing and payload codecs for the lottery intake protocol.
//!
//! This crate is sans-IO except for the two streaming entry points,
//! [`read_frame`] and [`write_frame`], which drive the frame codec over an
//! async byte transport. Everything else is pure parsing/rendering.

pub mod errors;
pub mod frame;
pub mod header;
pub mod message_type;
pub mod payloads;

pub use errors::{PayloadError, ProtocolError, ReadFrameError, WriteFrameError};
pub use frame::{read_frame, write_frame, Frame};
pub use header::FrameHeader;
pub use message_type::MessageType;
pub use payloads::{AgencyId, Bet};
