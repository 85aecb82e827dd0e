//! Async driver for the per-connection state machine (`spec.md` §4.E).
//!
//! This is the thin, effectful half that wraps `loto_core::session::classify`
//! with socket I/O and the two shared collaborators (the store and the
//! barrier), mirroring how the teacher workspace splits a pure
//! `ServerDriver::process_event` from the I/O-performing `handle_stream` in
//! `lockframe-server/src/lib.rs`.

use std::net::SocketAddr;
use std::sync::Arc;

use loto_core::session::{classify, ClassifyError, ParsedRequest};
use loto_core::{BarrierState, BetStore};
use loto_proto::payloads::{encode_winners_response, AckResponse};
use loto_proto::{read_frame, write_frame, MessageType, PayloadError, ReadFrameError};
use tokio::io::{AsyncRead, AsyncWrite};

/// Drive one client connection to completion.
///
/// Reads frames in a loop, dispatching each to the store or barrier as
/// `spec.md` §4.E prescribes, until the peer disconnects, a protocol
/// violation occurs, or a fatal I/O error is hit. Never panics: malformed
/// input only ever terminates this one session (`spec.md` §7).
pub async fn handle_connection<S>(
    mut stream: S,
    peer: SocketAddr,
    store: Arc<dyn BetStore>,
    barrier: Arc<BarrierState>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let (tag, body) = match read_frame(&mut stream).await {
            Ok(frame) => frame,
            Err(ReadFrameError::EndOfStream) => {
                tracing::debug!(%peer, "connection closed by peer");
                return;
            }
            Err(ReadFrameError::Protocol(err)) => {
                tracing::warn!(%peer, error = %err, "protocol error, closing session");
                return;
            }
            Err(ReadFrameError::FatalIo(err)) => {
                tracing::warn!(%peer, error = %err, "fatal I/O error, closing session");
                return;
            }
        };

        match classify(tag, &body) {
            Ok(ParsedRequest::Bet(bets)) => {
                match store.append(bets).await {
                    Ok(()) => {
                        if write_ack(&mut stream, MessageType::Bet, AckResponse::Success, peer)
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%peer, error = %err, "store write failed, closing session");
                        let _ = write_ack(&mut stream, MessageType::Bet, AckResponse::Error, peer).await;
                        return;
                    }
                }
            }
            Ok(ParsedRequest::FinishedSending(agency_id)) => {
                barrier.mark_finished(agency_id);
                if write_ack(
                    &mut stream,
                    MessageType::FinishedSending,
                    AckResponse::Success,
                    peer,
                )
                .await
                .is_err()
                {
                    return;
                }
            }
            Ok(ParsedRequest::WinnersRequest(agency_id)) => {
                if barrier.is_ready() {
                    let winners = match store.scan().await {
                        Ok(bets) => bets
                            .into_iter()
                            .filter(|bet| bet.agency_id == agency_id.0 && store.is_winner(bet))
                            .map(|bet| bet.document)
                            .collect::<Vec<_>>(),
                        Err(err) => {
                            tracing::warn!(%peer, error = %err, "store scan failed, closing session");
                            return;
                        }
                    };
                    let body = encode_winners_response(&winners);
                    if write_frame(&mut stream, MessageType::WinnersResponse, &body).await.is_err() {
                        return;
                    }
                } else {
                    let body = encode_winners_response(&[]);
                    if write_frame(&mut stream, MessageType::LotteryNotReady, &body).await.is_err() {
                        return;
                    }
                }
            }
            Err(ClassifyError::Payload(
                err @ (PayloadError::MalformedBet(_) | PayloadError::MalformedBatch(_)),
            )) => {
                tracing::debug!(%peer, error = %err, "malformed bet batch, closing session");
                let _ = write_ack(&mut stream, MessageType::Bet, AckResponse::Error, peer).await;
                return;
            }
            Err(ClassifyError::Payload(err @ PayloadError::MalformedId(_))) => {
                tracing::debug!(%peer, error = %err, "malformed agency id, session stays open");
                let offending = MessageType::from_tag(tag).unwrap_or(MessageType::Bet);
                if write_ack(&mut stream, offending, AckResponse::Error, peer).await.is_err() {
                    return;
                }
            }
            Err(ClassifyError::UnknownMessageType(unknown_tag)) => {
                tracing::debug!(%peer, tag = unknown_tag, "unknown message type, closing session");
                let _ = write_ack(&mut stream, MessageType::Bet, AckResponse::Error, peer).await;
                return;
            }
        }
    }
}

async fn write_ack<S>(
    stream: &mut S,
    message_type: MessageType,
    ack: AckResponse,
    peer: SocketAddr,
) -> Result<(), ()>
where
    S: AsyncWrite + Unpin,
{
    write_frame(stream, message_type, ack.encode()).await.map_err(|err| {
        tracing::warn!(%peer, error = %err, "write failed, closing session");
    })
}

#[cfg(test)]
mod tests {
    use loto_proto::payloads::encode_batch;
    use loto_proto::Bet;
    use tokio::io::duplex;

    use crate::store::MemoryStore;

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

    fn addr() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn single_bet_then_winners_happy_path() {
        let (mut client, server) = duplex(8192);
        let store: Arc<dyn BetStore> = Arc::new(MemoryStore::with_winning_number(7744));
        let barrier = Arc::new(BarrierState::new(1));

        let handle = tokio::spawn(handle_connection(server, addr(), store, barrier));

        let batch = encode_batch(&[sample_bet(1, 7744)]);
        write_frame(&mut client, MessageType::Bet, &batch).await.expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::BET_TAG);
        assert_eq!(body.as_ref(), b"success");

        write_frame(&mut client, MessageType::FinishedSending, b"AGENCY_ID=1")
            .await
            .expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::FINISHED_SENDING_TAG);
        assert_eq!(body.as_ref(), b"success");

        write_frame(&mut client, MessageType::WinnersRequest, b"AGENCY_ID=1")
            .await
            .expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::WINNERS_RESPONSE_TAG);
        assert_eq!(body.as_ref(), b"WINNERS=30111222");

        drop(client);
        handle.await.expect("handler task should not panic");
    }

    #[tokio::test]
    async fn winners_request_before_ready_keeps_session_open() {
        let (mut client, server) = duplex(8192);
        let store: Arc<dyn BetStore> = Arc::new(MemoryStore::new());
        let barrier = Arc::new(BarrierState::new(2));

        let handle = tokio::spawn(handle_connection(server, addr(), store, barrier));

        write_frame(&mut client, MessageType::WinnersRequest, b"AGENCY_ID=1")
            .await
            .expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::LOTTERY_NOT_READY_TAG);
        assert_eq!(body.as_ref(), b"WINNERS=");

        write_frame(&mut client, MessageType::FinishedSending, b"AGENCY_ID=1")
            .await
            .expect("session should still be open after LOTTERY_NOT_READY");
        let (tag, _) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::FINISHED_SENDING_TAG);

        drop(client);
        handle.await.expect("handler task should not panic");
    }

    #[tokio::test]
    async fn malformed_bet_closes_session() {
        let (mut client, server) = duplex(8192);
        let store: Arc<dyn BetStore> = Arc::new(MemoryStore::new());
        let barrier = Arc::new(BarrierState::new(1));

        let handle = tokio::spawn(handle_connection(server, addr(), store, barrier));

        write_frame(&mut client, MessageType::Bet, b"not a batch").await.expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::BET_TAG);
        assert_eq!(body.as_ref(), b"error");

        let result = read_frame(&mut client).await;
        assert!(matches!(result, Err(ReadFrameError::EndOfStream)));

        handle.await.expect("handler task should not panic");
    }

    #[tokio::test]
    async fn malformed_agency_id_does_not_close_session() {
        let (mut client, server) = duplex(8192);
        let store: Arc<dyn BetStore> = Arc::new(MemoryStore::new());
        let barrier = Arc::new(BarrierState::new(1));

        let handle = tokio::spawn(handle_connection(server, addr(), store, barrier));

        write_frame(&mut client, MessageType::FinishedSending, b"garbage")
            .await
            .expect("write should succeed");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::FINISHED_SENDING_TAG);
        assert_eq!(body.as_ref(), b"error");

        write_frame(&mut client, MessageType::FinishedSending, b"AGENCY_ID=1")
            .await
            .expect("session should still be open");
        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::FINISHED_SENDING_TAG);
        assert_eq!(body.as_ref(), b"success");

        drop(client);
        handle.await.expect("handler task should not panic");
    }

    #[tokio::test]
    async fn unknown_message_type_closes_session() {
        use loto_proto::Frame;
        use tokio::io::AsyncWriteExt;

        let (mut client, server) = duplex(8192);
        let store: Arc<dyn BetStore> = Arc::new(MemoryStore::new());
        let barrier = Arc::new(BarrierState::new(1));

        let handle = tokio::spawn(handle_connection(server, addr(), store, barrier));

        let frame = Frame::new(0x7f, Vec::new());
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("should encode");
        client.write_all(&wire).await.expect("write should succeed");

        let (tag, body) = read_frame(&mut client).await.expect("read should succeed");
        assert_eq!(tag, MessageType::BET_TAG);
        assert_eq!(body.as_ref(), b"error");

        handle.await.expect("handler task should not panic");
    }
}
