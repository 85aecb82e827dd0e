//! Payload codecs for each message body shape (`spec.md` §4.B).

pub mod agency;
pub mod bet;
pub mod batch;
pub mod response;

pub use agency::AgencyId;
pub use bet::Bet;
pub use batch::{decode_batch, encode_batch};
pub use response::{encode_winners_response, AckResponse};
