//! `BatchEnvelope` codec: the body of a client `BET` frame is a
//! concatenation of individually length-prefixed bets (`spec.md` §3, §4.B).
//!
//! Each inner entry is `| 4-byte BE length | 1-byte last_flag | length
//! bytes of bet payload |`, grounded on
//! `original_source/server/common/server.py`'s `parse_individual_bet_message`
//! / `parse_batch_bet_message`.

use crate::errors::PayloadError;
use crate::payloads::bet::Bet;

const INNER_HEADER_LEN: usize = 5;

/// Decode a `BatchEnvelope` body into its ordered bets.
///
/// Scans forward accumulating bets until an entry with `last_flag != 0` is
/// observed or the envelope is exhausted. A truncated inner frame, an
/// envelope whose offsets overflow the body, or an envelope with no
/// terminal entry (including an empty envelope) is
/// [`PayloadError::MalformedBatch`]. A malformed individual bet is
/// [`PayloadError::MalformedBet`].
pub fn decode_batch(body: &[u8]) -> Result<Vec<Bet>, PayloadError> {
    let mut bets = Vec::new();
    let mut offset = 0usize;
    let mut saw_terminal = false;

    while offset < body.len() {
        if offset + INNER_HEADER_LEN > body.len() {
            return Err(PayloadError::MalformedBatch(format!(
                "truncated inner header at offset {offset}"
            )));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&body[offset..offset + 4]);
        let inner_len = u32::from_be_bytes(len_bytes) as usize;
        let last_flag = body[offset + 4];

        let content_start = offset + INNER_HEADER_LEN;
        let content_end = content_start
            .checked_add(inner_len)
            .ok_or_else(|| PayloadError::MalformedBatch("inner length overflows offset".to_string()))?;

        if content_end > body.len() {
            return Err(PayloadError::MalformedBatch(format!(
                "inner frame at offset {offset} overflows envelope body"
            )));
        }

        let bet = Bet::decode(&body[content_start..content_end])?;
        bets.push(bet);

        offset = content_end;
        if last_flag != 0 {
            saw_terminal = true;
            break;
        }
    }

    if !saw_terminal {
        return Err(PayloadError::MalformedBatch(
            "envelope exhausted without a terminal entry".to_string(),
        ));
    }

    Ok(bets)
}

/// Encode `bets` (non-empty) as a `BatchEnvelope` body, marking only the
/// last entry as terminal. Used by tests and by reference client code.
///
/// # Panics
///
/// Panics if `bets` is empty — an empty batch has no representation
/// (`spec.md` §4.E: "An empty batch envelope is `MalformedBatch`").
#[must_use]
pub fn encode_batch(bets: &[Bet]) -> Vec<u8> {
    assert!(!bets.is_empty(), "cannot encode an empty batch envelope");

    let mut out = Vec::new();
    let last_index = bets.len() - 1;
    for (i, bet) in bets.iter().enumerate() {
        let content = bet.encode();
        #[allow(clippy::expect_used)]
        let len = u32::try_from(content.len())
            .expect("invariant: a single bet payload fits well within the frame ceiling");
        out.extend_from_slice(&len.to_be_bytes());
        out.push(u8::from(i == last_index));
        out.extend_from_slice(&content);
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample_bet(agency_id: u32, number: u16) -> Bet {
        Bet {
            agency_id,
            first_name: "Juan".to_string(),
            last_name: "Perez".to_string(),
            document: "30111222".to_string(),
            birthdate: "1990-01-01".to_string(),
            number,
        }
    }

    fn bet_strategy() -> impl Strategy<Value = Bet> {
        (0u32..10_000, 0u16..10_000).prop_map(|(agency_id, number)| sample_bet(agency_id, number))
    }

    proptest! {
        #[test]
        fn batch_round_trip(bets in prop::collection::vec(bet_strategy(), 1..8)) {
            let encoded = encode_batch(&bets);
            let decoded = decode_batch(&encoded).expect("should decode");
            prop_assert_eq!(decoded, bets);
        }
    }

    #[test]
    fn single_bet_batch_round_trips() {
        let bets = vec![sample_bet(1, 7744)];
        let encoded = encode_batch(&bets);
        let decoded = decode_batch(&encoded).expect("should decode");
        assert_eq!(decoded, bets);
    }

    #[test]
    fn empty_envelope_is_malformed_batch() {
        let result = decode_batch(&[]);
        assert!(matches!(result, Err(PayloadError::MalformedBatch(_))));
    }

    #[test]
    fn no_terminal_entry_is_malformed_batch() {
        let bet = sample_bet(1, 42);
        let content = bet.encode();
        let mut envelope = Vec::new();
        envelope.extend_from_slice(&(content.len() as u32).to_be_bytes());
        envelope.push(0); // last_flag = 0, and nothing follows
        envelope.extend_from_slice(&content);

        let result = decode_batch(&envelope);
        assert!(matches!(result, Err(PayloadError::MalformedBatch(_))));
    }

    #[test]
    fn truncated_inner_frame_is_malformed_batch() {
        let envelope = vec![0u8, 0, 0, 100, 1]; // claims 100 bytes of content, none present
        let result = decode_batch(&envelope);
        assert!(matches!(result, Err(PayloadError::MalformedBatch(_))));
    }

    #[test]
    fn malformed_bet_inside_batch_is_malformed_bet() {
        let bad_content = b"AGENCY_ID=1".to_vec(); // missing required fields
        let mut envelope = Vec::new();
        envelope.extend_from_slice(&(bad_content.len() as u32).to_be_bytes());
        envelope.push(1);
        envelope.extend_from_slice(&bad_content);

        let result = decode_batch(&envelope);
        assert!(matches!(result, Err(PayloadError::MalformedBet(_))));
    }
}
