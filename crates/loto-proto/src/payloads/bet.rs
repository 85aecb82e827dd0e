//! The `Bet` record and its `KEY=value` wire encoding (`spec.md` §3, §4.B).

use std::collections::HashMap;

use crate::errors::PayloadError;

/// The six required field names, in the canonical (upper-cased) form used
/// for matching. Order on the wire is arbitrary (`spec.md` §4.B).
const FIELDS: [&str; 6] = ["AGENCY_ID", "NOMBRE", "APELLIDO", "DOCUMENTO", "NACIMIENTO", "NUMERO"];

/// A single lottery bet record (`spec.md` §3).
///
/// All fields except `agency_id` and `number` are held as opaque strings;
/// the core never interprets `document`/`birthdate` beyond passing them
/// through, per `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bet {
    /// The submitting agency's identity.
    pub agency_id: u32,
    /// First name (`NOMBRE` on the wire).
    pub first_name: String,
    /// Last name (`APELLIDO` on the wire).
    pub last_name: String,
    /// National ID document, opaque to the core (`DOCUMENTO`).
    pub document: String,
    /// Birthdate in `YYYY-MM-DD` form, opaque to the core except to
    /// `is_winner` (`NACIMIENTO`).
    pub birthdate: String,
    /// The lottery guess, conceptually 0-9999 (`NUMERO`).
    pub number: u16,
}

impl Bet {
    /// Parse a single bet from its `KEY=value,KEY=value,...` wire form.
    ///
    /// Keys are matched case-insensitively after upper-casing; surrounding
    /// whitespace around keys and values is trimmed; empty comma-separated
    /// segments are ignored. Missing any of the six required fields, or a
    /// non-numeric `AGENCY_ID`/`NUMERO`, yields [`PayloadError::MalformedBet`].
    pub fn decode(body: &[u8]) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(body)
            .map_err(|_| PayloadError::MalformedBet("body is not valid UTF-8".to_string()))?;

        let mut kv: HashMap<String, String> = HashMap::new();
        for segment in text.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            kv.insert(key.trim().to_uppercase(), value.trim().to_string());
        }

        for required in FIELDS {
            if !kv.contains_key(required) {
                return Err(PayloadError::MalformedBet(format!("missing field {required}")));
            }
        }

        let agency_id = kv["AGENCY_ID"]
            .parse::<u32>()
            .map_err(|_| PayloadError::MalformedBet("AGENCY_ID is not a valid integer".to_string()))?;
        let number = kv["NUMERO"]
            .parse::<u16>()
            .map_err(|_| PayloadError::MalformedBet("NUMERO is not a valid integer".to_string()))?;

        Ok(Self {
            agency_id,
            first_name: kv["NOMBRE"].clone(),
            last_name: kv["APELLIDO"].clone(),
            document: kv["DOCUMENTO"].clone(),
            birthdate: kv["NACIMIENTO"].clone(),
            number,
        })
    }

    /// Render this bet back to its `KEY=value,...` wire form. Used by tests
    /// and by the batch envelope encoder.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "AGENCY_ID={},NOMBRE={},APELLIDO={},DOCUMENTO={},NACIMIENTO={},NUMERO={}",
            self.agency_id, self.first_name, self.last_name, self.document, self.birthdate, self.number
        )
        .into_bytes()
    }
}
