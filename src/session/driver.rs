//! Read loop that feeds one byte stream into a session.
//!
//! Chunks are processed strictly in arrival order, one at a time. All
//! decode/frame/interpret work for a chunk happens under the session lock,
//! so two chunks never interleave and a concurrent `cancel()` waits for at
//! most the chunk in flight.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::state::StreamSession;
use crate::sse::{Payload, SseParser};
use crate::traits::{ByteStream, HttpError};

pub(crate) type SharedSession = Arc<Mutex<StreamSession>>;

pub(crate) fn lock(session: &Mutex<StreamSession>) -> MutexGuard<'_, StreamSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Flow {
    Continue,
    Stop,
}

/// Open the byte stream and consume it until completion, error or cancellation.
///
/// `token` is the session token captured when the stream was started. Once
/// it fires, this loop never touches the session again, even if the session
/// has since been reset and reused.
pub(crate) async fn run<F>(session: SharedSession, token: CancellationToken, connect: F)
where
    F: Future<Output = Result<ByteStream, HttpError>> + Send,
{
    let connected = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Stream cancelled before the response opened");
            return;
        }
        result = connect => result,
    };

    match connected {
        Ok(bytes) => consume(&session, &token, bytes).await,
        Err(e) => fail(&session, &token, e),
    }
}

async fn consume(session: &Mutex<StreamSession>, token: &CancellationToken, mut bytes: ByteStream) {
    let mut parser = SseParser::new();
    let mut chunks: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Read loop stopped by cancellation after {} chunk(s)", chunks);
                return;
            }
            next = bytes.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                chunks += 1;
                let payloads = parser.feed(&chunk);
                if let Flow::Stop = apply(session, token, payloads) {
                    debug!("Read loop finished after {} chunk(s)", chunks);
                    return;
                }
            }
            Some(Err(e)) => {
                fail(session, token, e);
                return;
            }
            None => {
                let payloads = parser.finish();
                if let Flow::Continue = apply(session, token, payloads) {
                    end_of_transport(session, token);
                }
                debug!("Byte stream closed after {} chunk(s)", chunks);
                return;
            }
        }
    }
}

fn apply(session: &Mutex<StreamSession>, token: &CancellationToken, payloads: Vec<Payload>) -> Flow {
    if payloads.is_empty() {
        return Flow::Continue;
    }
    let mut session = lock(session);
    for payload in payloads {
        if token.is_cancelled() {
            return Flow::Stop;
        }
        match payload {
            Payload::Fragment(text) => {
                if !session.on_fragment(&text) {
                    return Flow::Stop;
                }
            }
            Payload::Ignore => {}
            Payload::Terminate => {
                session.on_terminate();
                return Flow::Stop;
            }
        }
    }
    Flow::Continue
}

fn end_of_transport(session: &Mutex<StreamSession>, token: &CancellationToken) {
    let mut session = lock(session);
    if !token.is_cancelled() {
        session.on_transport_end();
    }
}

fn fail(session: &Mutex<StreamSession>, token: &CancellationToken, error: HttpError) {
    let mut session = lock(session);
    if !token.is_cancelled() {
        session.on_error(error.into());
    }
}
