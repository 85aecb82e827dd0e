//! The per-connection session state machine's pure core (`spec.md` §4.E).
//!
//! `classify` is the sans-IO half of the DISPATCH state: given a decoded
//! frame, it parses the body and tells the caller which request this is (or
//! why it could not be understood). It performs no socket I/O and touches
//! neither the store nor the barrier — those side effects, and the
//! resulting WRITING/CLOSED transitions, belong to the async driver in
//! `loto-server` (mirroring how the teacher workspace's `ServerDriver`
//! returns actions rather than performing them).

use loto_proto::payloads::{decode_batch, AgencyId, Bet};
use loto_proto::{MessageType, PayloadError};

/// The four states of `spec.md` §4.E, carried for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for / reading the next frame's header and body.
    Reading,
    /// Classifying and acting on a fully-read frame.
    Dispatch,
    /// Writing the response frame.
    Writing,
    /// Terminal: the connection is closed.
    Closed,
}

/// A successfully classified client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRequest {
    /// A non-empty batch of bets to append.
    Bet(Vec<Bet>),
    /// An agency declaring it is done sending.
    FinishedSending(AgencyId),
    /// An agency asking for its winning documents.
    WinnersRequest(AgencyId),
}

/// Why a frame could not be classified into a [`ParsedRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The body failed to parse for the message type it carried.
    Payload(PayloadError),
    /// The frame's type tag is not one of the five recognized kinds.
    UnknownMessageType(u8),
}

impl From<PayloadError> for ClassifyError {
    fn from(err: PayloadError) -> Self {
        Self::Payload(err)
    }
}

/// Classify a decoded frame (`message_type_tag`, `body`) into a request, or
/// the reason it was rejected.
///
/// Per `spec.md` §4.A, an unknown type tag is not rejected by the frame
/// codec — it reaches here, where it becomes [`ClassifyError::UnknownMessageType`].
/// `WINNERS_RESPONSE` and `LOTTERY_NOT_READY` are server-to-client-only and
/// are treated as unknown if a client ever sends them.
pub fn classify(message_type_tag: u8, body: &[u8]) -> Result<ParsedRequest, ClassifyError> {
    match MessageType::from_tag(message_type_tag) {
        Some(MessageType::Bet) => Ok(ParsedRequest::Bet(decode_batch(body)?)),
        Some(MessageType::FinishedSending) => Ok(ParsedRequest::FinishedSending(AgencyId::decode(body)?)),
        Some(MessageType::WinnersRequest) => Ok(ParsedRequest::WinnersRequest(AgencyId::decode(body)?)),
        Some(MessageType::WinnersResponse | MessageType::LotteryNotReady) | None => {
            Err(ClassifyError::UnknownMessageType(message_type_tag))
        }
    }
}
