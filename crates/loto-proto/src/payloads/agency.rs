//! `AGENCY_ID=<value>` body, shared by `FinishedSending` and
//! `WinnersRequest` (`spec.md` §4.B).

use crate::errors::PayloadError;

/// An agency's identity, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgencyId(pub u32);

impl AgencyId {
    /// Parse a body shaped exactly `AGENCY_ID=<value>`.
    ///
    /// Any other shape — missing `=`, a different key, or a non-numeric
    /// value — is [`PayloadError::MalformedId`].
    pub fn decode(body: &[u8]) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(body)
            .map_err(|_| PayloadError::MalformedId("body is not valid UTF-8".to_string()))?;

        let (key, value) = text
            .split_once('=')
            .ok_or_else(|| PayloadError::MalformedId("invalid agency ID message format".to_string()))?;

        if key.trim().to_uppercase() != "AGENCY_ID" {
            return Err(PayloadError::MalformedId("expected AGENCY_ID field".to_string()));
        }

        let id = value
            .trim()
            .parse::<u32>()
            .map_err(|_| PayloadError::MalformedId("AGENCY_ID is not a valid integer".to_string()))?;

        Ok(Self(id))
    }

    /// Render back to wire form. Used by tests and reference client code.
    #[must_use]
    pub fn encode(self) -> Vec<u8> {
        format!("AGENCY_ID={}", self.0).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_body() {
        assert_eq!(AgencyId::decode(b"AGENCY_ID=1").expect("should decode"), AgencyId(1));
    }

    #[test]
    fn is_case_insensitive_and_whitespace_tolerant() {
        assert_eq!(AgencyId::decode(b" agency_id = 42 ").expect("should decode"), AgencyId(42));
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(matches!(AgencyId::decode(b"AGENCY_ID"), Err(PayloadError::MalformedId(_))));
    }

    #[test]
    fn rejects_wrong_key() {
        assert!(matches!(AgencyId::decode(b"NUMERO=1"), Err(PayloadError::MalformedId(_))));
    }

    #[test]
    fn rejects_non_numeric_value() {
        assert!(matches!(AgencyId::decode(b"AGENCY_ID=abc"), Err(PayloadError::MalformedId(_))));
    }

    #[test]
    fn round_trips() {
        let id = AgencyId(7);
        assert_eq!(AgencyId::decode(&id.encode()).expect("should decode"), id);
    }
}
