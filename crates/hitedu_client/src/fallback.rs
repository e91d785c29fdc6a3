//! crates/hitedu_client/src/fallback.rs
//!
//! The fallback orchestrator: the one place in the client with branching
//! logic. Every domain operation is expressed as a (primary, secondary)
//! pair of async callables and routed through `with_fallback`, which
//! always tries the HTTP backend first and re-routes to the local store
//! only when the request never reached a server at all.

use std::future::Future;

use hitedu_core::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

//=========================================================================================
// Transport Classification
//=========================================================================================

/// Decides whether a primary-store failure counts as a transport failure.
///
/// The test is the origin of the error: did a request/response cycle
/// complete at all? Connect failures, timeouts, and requests that died
/// mid-send never produced a response, so the caller may be served from
/// the local store instead. A builder error means the request was
/// malformed before any I/O happened (a bug to surface, not an
/// availability signal), and a redirect loop means servers were answering
/// all along.
pub fn is_transport_error(err: &reqwest::Error) -> bool {
    if err.is_builder() || err.is_redirect() || err.is_status() || err.is_body() || err.is_decode()
    {
        return false;
    }
    err.is_connect() || err.is_timeout() || err.is_request()
}

//=========================================================================================
// Response Decoding
//=========================================================================================

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turns a raw primary-store response into the decoded payload.
///
/// A non-success status is an application rejection: the server-supplied
/// `error` message is carried through verbatim, with a generic message
/// when the body has none. Neither case is grounds for falling back.
pub(crate) async fn decode_response<T: DeserializeOwned>(res: reqwest::Response) -> StoreResult<T> {
    let status = res.status();
    if !status.is_success() {
        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        return Err(StoreError::Rejected(message));
    }
    res.json::<T>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

//=========================================================================================
// The Orchestrator
//=========================================================================================

/// Runs `primary`; on transport failure only, runs `secondary` instead.
///
/// Exactly one of {primary success, primary rejection, secondary success,
/// secondary error} is the outcome of every call: the secondary store is
/// never consulted once the primary produced any response, successful or
/// not.
pub async fn with_fallback<T, P, PFut, S, SFut>(primary: P, secondary: S) -> StoreResult<T>
where
    T: DeserializeOwned,
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    S: FnOnce() -> SFut,
    SFut: Future<Output = StoreResult<T>>,
{
    with_fallback_classified(is_transport_error, primary, secondary).await
}

/// `with_fallback` with an injectable transport predicate.
pub async fn with_fallback_classified<C, T, P, PFut, S, SFut>(
    is_transport: C,
    primary: P,
    secondary: S,
) -> StoreResult<T>
where
    C: Fn(&reqwest::Error) -> bool,
    T: DeserializeOwned,
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    S: FnOnce() -> SFut,
    SFut: Future<Output = StoreResult<T>>,
{
    match primary().await {
        Ok(res) => decode_response(res).await,
        Err(err) if is_transport(&err) => {
            warn!("Backend connection failed, falling back to local store: {}", err);
            secondary().await
        }
        // Anything that is not a transport failure propagates unchanged;
        // it is never groundwork for falling back.
        Err(err) => Err(StoreError::Rejected(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A base URL nothing listens on: bind an ephemeral port, then drop
    /// the listener before anyone connects.
    fn dead_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/ping", addr)
    }

    #[tokio::test]
    async fn transport_failure_runs_the_secondary_exactly_once() {
        let url = dead_endpoint();
        let calls = AtomicUsize::new(0);

        let result: StoreResult<u32> = with_fallback(
            || reqwest::get(url.clone()),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            },
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn secondary_errors_surface_as_is() {
        let url = dead_endpoint();
        let result: StoreResult<u32> = with_fallback(
            || reqwest::get(url.clone()),
            || async { Err(StoreError::DuplicateUser) },
        )
        .await;
        assert!(matches!(result, Err(StoreError::DuplicateUser)));
    }

    #[tokio::test]
    async fn unclassified_errors_propagate_without_touching_the_secondary() {
        let url = dead_endpoint();
        let calls = AtomicUsize::new(0);

        // Same connection-refused failure, but a predicate that refuses to
        // classify it as transport: the fallback path must stay closed.
        let result: StoreResult<u32> = with_fallback_classified(
            |_| false,
            || reqwest::get(url.clone()),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            },
        )
        .await;

        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn builder_errors_are_bugs_not_outages() {
        let calls = AtomicUsize::new(0);

        let result: StoreResult<u32> = with_fallback(
            || reqwest::get("not a url"),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            },
        )
        .await;

        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn connection_refused_classifies_as_transport() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(reqwest::get(dead_endpoint()))
            .expect_err("nothing listens there");
        assert!(is_transport_error(&err));
    }
}
