//! The one-byte message type tag carried in every frame header.

/// Recognized wire message kinds (see `spec.md` §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `C→S` a batch of bets; `S→C` `success`/`error`.
    Bet,
    /// `C→S`/`S→C` an agency declaring it has no more bets to send.
    FinishedSending,
    /// `C→S` a request for one agency's winning documents.
    WinnersRequest,
    /// `S→C` the winning documents for a requested agency.
    WinnersResponse,
    /// `S→C` sent in place of `WinnersResponse` while the barrier is unmet.
    LotteryNotReady,
}

impl MessageType {
    /// BET tag (`0x01`).
    pub const BET_TAG: u8 = 0x01;
    /// FINISHED_SENDING tag (`0x02`).
    pub const FINISHED_SENDING_TAG: u8 = 0x02;
    /// WINNERS_REQUEST tag (`0x03`).
    pub const WINNERS_REQUEST_TAG: u8 = 0x03;
    /// WINNERS_RESPONSE tag (`0x04`).
    pub const WINNERS_RESPONSE_TAG: u8 = 0x04;
    /// LOTTERY_NOT_READY tag (`0x05`).
    pub const LOTTERY_NOT_READY_TAG: u8 = 0x05;

    /// Map a wire tag to a recognized type, or `None` for unknown tags.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            Self::BET_TAG => Some(Self::Bet),
            Self::FINISHED_SENDING_TAG => Some(Self::FinishedSending),
            Self::WINNERS_REQUEST_TAG => Some(Self::WinnersRequest),
            Self::WINNERS_RESPONSE_TAG => Some(Self::WinnersResponse),
            Self::LOTTERY_NOT_READY_TAG => Some(Self::LotteryNotReady),
            _ => None,
        }
    }

    /// This type's wire tag.
    #[must_use]
    pub fn to_tag(self) -> u8 {
        match self {
            Self::Bet => Self::BET_TAG,
            Self::FinishedSending => Self::FINISHED_SENDING_TAG,
            Self::WinnersRequest => Self::WINNERS_REQUEST_TAG,
            Self::WinnersResponse => Self::WINNERS_RESPONSE_TAG,
            Self::LotteryNotReady => Self::LOTTERY_NOT_READY_TAG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MessageType;

    #[test]
    fn tags_round_trip() {
        for mt in [
            MessageType::Bet,
            MessageType::FinishedSending,
            MessageType::WinnersRequest,
            MessageType::WinnersResponse,
            MessageType::LotteryNotReady,
        ] {
            assert_eq!(MessageType::from_tag(mt.to_tag()), Some(mt));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(MessageType::from_tag(0x99), None);
    }
}
