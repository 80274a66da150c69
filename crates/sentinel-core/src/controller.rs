//! Request lifecycle state machine.
//!
//! At most one remote call is outstanding at a time. The controller decides
//! what gets appended to the [`MessageLog`] and when:
//!
//! ```text
//! Idle --submit--> Pending
//! Pending --(success settle, seq matches)--> Idle   [append assistant response]
//! Pending --(error settle, seq matches)--> Idle     [append error notice]
//! Pending --cancel()--> Idle                        [append cancel notice, synchronously]
//! Pending --(any settle, seq superseded)--> Idle    [no-op, entry already appended]
//! ```
//!
//! The controller is driven from a single task: `submit`/`cancel` are called
//! by the owner, and every settle is pulled via [`RequestController::next_settle`]
//! and fed back through [`RequestController::reconcile`] on that same task.
//! The spawned transport call is the only concurrency, and it communicates
//! exclusively through the settle channel, so the log and the state need no
//! locks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chat::ChatEntry;
use crate::log::MessageLog;
use crate::transport::{Transport, TransportError};

/// Fixed notice appended when the user cancels an in-flight request.
pub const CANCEL_NOTICE: &str = "Okay, request cancelled.";

/// Fixed notice appended when a request fails for any reason other than
/// cancellation. No error detail leaks into the conversation.
pub const ERROR_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

/// Public view of the request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No outstanding request.
    #[default]
    Idle,
    /// Exactly one outstanding request.
    Pending,
}

/// The one outstanding call: its identity and its live cancellation handle.
#[derive(Debug)]
struct Inflight {
    seq: u64,
    token: CancellationToken,
}

/// Outcome of a transport call, tagged with the identity of the request that
/// issued it. A settle whose seq no longer matches the in-flight request was
/// cancelled locally in the meantime and must not touch the log.
#[derive(Debug)]
pub struct Settle {
    seq: u64,
    outcome: Result<String, TransportError>,
}

/// Owns the lifecycle of at most one outstanding remote call and mediates
/// between user intent (send / cancel) and the message log.
pub struct RequestController {
    transport: Arc<dyn Transport>,
    user_id: String,
    log: MessageLog,
    inflight: Option<Inflight>,
    next_seq: u64,
    settle_tx: mpsc::UnboundedSender<Settle>,
    settle_rx: mpsc::UnboundedReceiver<Settle>,
}

impl RequestController {
    /// Create an idle controller for the given transport.
    pub fn new(transport: Arc<dyn Transport>, user_id: impl Into<String>) -> Self {
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            user_id: user_id.into(),
            log: MessageLog::new(),
            inflight: None,
            next_seq: 0,
            settle_tx,
            settle_rx,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.inflight.is_some() {
            Phase::Pending
        } else {
            Phase::Idle
        }
    }

    /// The conversation log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Subscribe to log appends (for the rendering layer).
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ChatEntry> {
        self.log.subscribe()
    }

    /// Submit user text, starting a remote call.
    ///
    /// Returns `true` if a request was started. Whitespace-only input and
    /// submissions while a request is already pending are silently ignored
    /// (`false`): no entry, no state change. Callers clear their input
    /// buffer iff this returns `true`.
    pub fn submit(&mut self, raw: &str) -> bool {
        if self.inflight.is_some() {
            // UI gating should prevent this path; never overwrite a live token.
            warn!("submit ignored: a request is already pending");
            return false;
        }
        let text = raw.trim();
        if text.is_empty() {
            debug!("submit ignored: empty input");
            return false;
        }

        // The user entry goes in before the call is issued, so it is visible
        // immediately and always precedes its assistant entry.
        self.log.append(ChatEntry::user(text));

        let seq = self.next_seq;
        self.next_seq += 1;
        let token = CancellationToken::new();

        let transport = Arc::clone(&self.transport);
        let query = text.to_string();
        let user_id = self.user_id.clone();
        let call_token = token.clone();
        let settle_tx = self.settle_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.send_query(&query, &user_id, call_token).await;
            // Receiver only goes away on controller teardown.
            settle_tx.send(Settle { seq, outcome }).ok();
        });

        info!(seq, "request submitted");
        self.inflight = Some(Inflight { seq, token });
        true
    }

    /// Cancel the outstanding request, if any.
    ///
    /// Signals the cancellation token, appends the fixed cancellation notice
    /// and returns to `Idle` immediately, without waiting for the transport
    /// to acknowledge the abort. Returns `false` when idle (no-op).
    pub fn cancel(&mut self) -> bool {
        let Some(inflight) = self.inflight.take() else {
            return false;
        };
        inflight.token.cancel();
        info!(seq = inflight.seq, "request cancelled by user");
        self.log.append(ChatEntry::assistant(CANCEL_NOTICE));
        true
    }

    /// Wait for the next settle from the in-flight call.
    ///
    /// Yields even for requests that were cancelled locally after the
    /// transport call went out; `reconcile` decides whether the settle still
    /// counts.
    pub async fn next_settle(&mut self) -> Option<Settle> {
        self.settle_rx.recv().await
    }

    /// Reconcile a settled call with the current state.
    ///
    /// Only a settle whose seq matches the in-flight request may mutate the
    /// log; anything else was cancelled or superseded and its notice has
    /// already been appended. A cancelled request is never resurrected into
    /// `Pending`.
    pub fn reconcile(&mut self, settle: Settle) {
        match &self.inflight {
            Some(inflight) if inflight.seq == settle.seq => {}
            _ => {
                debug!(seq = settle.seq, "dropping stale settle");
                return;
            }
        }
        self.inflight = None;

        match settle.outcome {
            Ok(text) => {
                info!(seq = settle.seq, "request resolved");
                self.log.append(ChatEntry::assistant(text));
            }
            Err(TransportError::Cancelled) => {
                // Transports differ in whether a cancelled call's settle runs
                // at all; when it does, the notice already exists.
                debug!(seq = settle.seq, "transport reported cancellation");
            }
            Err(err) => {
                warn!(seq = settle.seq, error = %err, "request failed");
                self.log.append(ChatEntry::assistant(ERROR_NOTICE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use async_trait::async_trait;

    /// Transport that settles immediately with a fixed response.
    struct EchoTransport(String);

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send_query(
            &self,
            _query: &str,
            _user_id: &str,
            _cancel: CancellationToken,
        ) -> Result<String, TransportError> {
            Ok(self.0.clone())
        }
    }

    /// Transport that settles immediately with a failure.
    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send_query(
            &self,
            _query: &str,
            _user_id: &str,
            _cancel: CancellationToken,
        ) -> Result<String, TransportError> {
            Err(TransportError::Status(500))
        }
    }

    /// Transport that hangs until its token fires, then reports cancellation.
    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn send_query(
            &self,
            _query: &str,
            _user_id: &str,
            cancel: CancellationToken,
        ) -> Result<String, TransportError> {
            cancel.cancelled().await;
            Err(TransportError::Cancelled)
        }
    }

    fn controller(transport: impl Transport + 'static) -> RequestController {
        RequestController::new(Arc::new(transport), "test_user")
    }

    fn texts(controller: &RequestController) -> Vec<(Sender, &str)> {
        controller
            .log()
            .entries()
            .iter()
            .map(|e| (e.sender, e.text.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_then_success() {
        let mut c = controller(EchoTransport("hi there".into()));

        assert!(c.submit("hello"));
        assert_eq!(c.phase(), Phase::Pending);
        // User entry is visible before the call settles.
        assert_eq!(texts(&c), vec![(Sender::User, "hello")]);

        let settle = c.next_settle().await.unwrap();
        c.reconcile(settle);

        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(
            texts(&c),
            vec![(Sender::User, "hello"), (Sender::Assistant, "hi there")]
        );
    }

    #[tokio::test]
    async fn test_submit_then_failure() {
        let mut c = controller(FailingTransport);

        assert!(c.submit("hello"));
        let settle = c.next_settle().await.unwrap();
        c.reconcile(settle);

        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(
            texts(&c),
            vec![(Sender::User, "hello"), (Sender::Assistant, ERROR_NOTICE)]
        );
    }

    #[tokio::test]
    async fn test_cancel_before_settle() {
        let mut c = controller(HangingTransport);

        assert!(c.submit("hello"));
        assert!(c.cancel());

        // Cancellation is local and synchronous.
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(
            texts(&c),
            vec![(Sender::User, "hello"), (Sender::Assistant, CANCEL_NOTICE)]
        );

        // The transport's own settle arrives afterwards (the token fired and
        // unblocked it) and must not touch the log again.
        let settle = c.next_settle().await.unwrap();
        c.reconcile(settle);
        assert_eq!(c.log().len(), 2);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_stale_error_settle_after_cancel() {
        // A cancelled-then-late-arriving *error* must not append a second
        // notice: the seq check, not the error kind, is the guard.
        let mut c = controller(HangingTransport);

        assert!(c.submit("hello"));
        assert!(c.cancel());

        c.reconcile(Settle {
            seq: 0,
            outcome: Err(TransportError::Connection("reset by peer".into())),
        });
        assert_eq!(c.log().len(), 2);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_whitespace_submit_is_ignored() {
        let mut c = controller(EchoTransport("unused".into()));

        assert!(!c.submit(""));
        assert!(!c.submit("   "));
        assert!(!c.submit("\n\t"));

        assert!(c.log().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_rejected() {
        let mut c = controller(HangingTransport);

        assert!(c.submit("a"));
        assert!(!c.submit("b"));

        assert_eq!(c.phase(), Phase::Pending);
        assert_eq!(texts(&c), vec![(Sender::User, "a")]);
    }

    #[tokio::test]
    async fn test_cancel_while_idle_is_noop() {
        let mut c = controller(EchoTransport("unused".into()));
        assert!(!c.cancel());
        assert!(c.log().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let mut c = controller(EchoTransport("ok".into()));
        assert!(c.submit("  hello \n"));
        assert_eq!(c.log().entries()[0].text, "hello");
    }

    #[tokio::test]
    async fn test_machine_cycles_across_requests() {
        let mut c = controller(EchoTransport("pong".into()));

        for round in 0..3 {
            assert!(c.submit(&format!("ping {round}")));
            let settle = c.next_settle().await.unwrap();
            c.reconcile(settle);
            assert_eq!(c.phase(), Phase::Idle);
        }

        // Strict per-request ordering: each user entry directly precedes its
        // assistant entry.
        let entries = c.log().entries();
        assert_eq!(entries.len(), 6);
        for pair in entries.chunks(2) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[1].sender, Sender::Assistant);
        }
    }

    #[tokio::test]
    async fn test_resubmit_after_cancel() {
        let mut c = controller(HangingTransport);

        assert!(c.submit("first"));
        assert!(c.cancel());

        // Back to Idle means a fresh submit is accepted immediately.
        assert!(c.submit("second"));
        assert_eq!(c.phase(), Phase::Pending);

        // The first call's settle is stale; the second is still in flight.
        let settle = c.next_settle().await.unwrap();
        c.reconcile(settle);
        assert_eq!(c.phase(), Phase::Pending);
        assert_eq!(c.log().len(), 3);
    }

    #[tokio::test]
    async fn test_log_observer_sees_lifecycle_appends() {
        let mut c = controller(EchoTransport("hi".into()));
        let mut rx = c.subscribe();

        c.submit("hello");
        let settle = c.next_settle().await.unwrap();
        c.reconcile(settle);

        assert_eq!(rx.try_recv().unwrap().sender, Sender::User);
        assert_eq!(rx.try_recv().unwrap().sender, Sender::Assistant);
        assert!(rx.try_recv().is_err());
    }
}
