//! Literal response bodies: `success`/`error` and `WINNERS=...`
//! (`spec.md` §4.B).

/// The literal `BET`/`FINISHED_SENDING` acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResponse {
    /// `"success"`.
    Success,
    /// `"error"`.
    Error,
}

const SUCCESS_STR: &str = "success";
const ERROR_STR: &str = "error";

impl AckResponse {
    /// Render to the literal ASCII body.
    #[must_use]
    pub fn encode(self) -> &'static [u8] {
        match self {
            Self::Success => SUCCESS_STR.as_bytes(),
            Self::Error => ERROR_STR.as_bytes(),
        }
    }
}

/// The `WINNERS=doc1,doc2,...` body sent for `WINNERS_RESPONSE` and
/// `LOTTERY_NOT_READY` (empty list in the latter case).
#[must_use]
pub fn encode_winners_response(documents: &[String]) -> Vec<u8> {
    format!("WINNERS={}", documents.join(",")).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_bodies_are_literal() {
        assert_eq!(AckResponse::Success.encode(), b"success");
        assert_eq!(AckResponse::Error.encode(), b"error");
    }

    #[test]
    fn winners_response_joins_documents() {
        let docs = vec!["30111222".to_string(), "30333444".to_string()];
        assert_eq!(encode_winners_response(&docs), b"WINNERS=30111222,30333444");
    }

    #[test]
    fn empty_winners_response_has_no_trailing_list() {
        assert_eq!(encode_winners_response(&[]), b"WINNERS=");
    }
}
