//! Capture sessions: one in-flight extraction per session, last capture wins.
//!
//! Each `begin` bumps the session's generation and cancels the previous
//! ticket. A result is applied only if its ticket still holds the current
//! generation; the check and the apply happen under the same lock as `begin`,
//! so a stale result can never overwrite a newer capture.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use uuid::Uuid;

use super::extraction::{ExtractedFields, ExtractionError, ExtractionPipeline, OcrEngine};

// ═══════════════════════════════════════════════════════════
// Cancellation
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct CancelSignal {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Handle for one capture attempt within a session.
#[derive(Debug, Clone)]
pub struct CaptureTicket {
    session_id: Uuid,
    generation: u64,
    signal: Arc<CancelSignal>,
}

impl CaptureTicket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set once a newer capture starts or the session ends.
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Resolves when this ticket is superseded or its session ends.
    pub async fn cancelled(&self) {
        self.signal.cancelled().await
    }
}

/// What happened to an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Applied,
    Superseded,
}

// ═══════════════════════════════════════════════════════════
// CaptureCoordinator
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
struct SessionSlot {
    generation: u64,
    signal: Arc<CancelSignal>,
}

/// Tracks the current capture per session and gates result delivery.
pub struct CaptureCoordinator {
    pipeline: Arc<ExtractionPipeline>,
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
}

impl Default for CaptureCoordinator {
    fn default() -> Self {
        Self::new(ExtractionPipeline::default())
    }
}

impl CaptureCoordinator {
    pub fn new(pipeline: ExtractionPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionSlot>> {
        // Slot updates are single assignments; a poisoned map is still consistent.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a capture, superseding any pending one in the same session.
    pub fn begin(&self, session_id: Uuid) -> CaptureTicket {
        let mut sessions = self.lock_sessions();
        let signal = Arc::new(CancelSignal::default());

        let generation = match sessions.get_mut(&session_id) {
            Some(slot) => {
                slot.signal.cancel();
                slot.generation += 1;
                slot.signal = signal.clone();
                tracing::debug!(
                    session = %session_id,
                    generation = slot.generation,
                    "Capture superseded previous attempt"
                );
                slot.generation
            }
            None => {
                sessions.insert(
                    session_id,
                    SessionSlot {
                        generation: 1,
                        signal: signal.clone(),
                    },
                );
                1
            }
        };

        CaptureTicket {
            session_id,
            generation,
            signal,
        }
    }

    pub fn is_current(&self, ticket: &CaptureTicket) -> bool {
        let sessions = self.lock_sessions();
        Self::slot_matches(&sessions, ticket)
    }

    fn slot_matches(sessions: &HashMap<Uuid, SessionSlot>, ticket: &CaptureTicket) -> bool {
        sessions
            .get(&ticket.session_id)
            .is_some_and(|slot| slot.generation == ticket.generation)
    }

    /// Current generation of a session, `None` if it has no capture.
    pub fn generation(&self, session_id: Uuid) -> Option<u64> {
        self.lock_sessions().get(&session_id).map(|slot| slot.generation)
    }

    /// Deliver `fields` to `apply` if `ticket` is still current.
    ///
    /// `apply` runs while the session map is locked and must not call back into
    /// the coordinator.
    pub fn complete<A>(&self, ticket: &CaptureTicket, fields: ExtractedFields, apply: A) -> CaptureOutcome
    where
        A: FnOnce(ExtractedFields),
    {
        let sessions = self.lock_sessions();
        if !Self::slot_matches(&sessions, ticket) {
            tracing::debug!(
                session = %ticket.session_id,
                generation = ticket.generation,
                "Discarding stale extraction result"
            );
            return CaptureOutcome::Superseded;
        }
        apply(fields);
        CaptureOutcome::Applied
    }

    /// Forget a session and cancel its pending capture, if any.
    pub fn end(&self, session_id: Uuid) {
        if let Some(slot) = self.lock_sessions().remove(&session_id) {
            slot.signal.cancel();
        }
    }

    /// Run one capture: await recognition, extract off the async thread, apply.
    ///
    /// The capture begins when `submit` is called, before the returned future
    /// is first polled, so creating a newer capture's future already supersedes
    /// this one. Recognition errors are logged and treated as "no text". If a
    /// newer capture starts in the same session before this one finishes, the
    /// result is dropped and `apply` is never called.
    pub fn submit<'a, F, A>(
        &'a self,
        session_id: Uuid,
        recognition: F,
        apply: A,
    ) -> impl Future<Output = CaptureOutcome> + 'a
    where
        F: Future<Output = Result<Option<String>, ExtractionError>> + 'a,
        A: FnOnce(ExtractedFields) + 'a,
    {
        let ticket = self.begin(session_id);

        async move {
            let recognized = tokio::select! {
                biased;
                _ = ticket.cancelled() => return CaptureOutcome::Superseded,
                result = recognition => result,
            };

            let text = match recognized {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(session = %session_id, error = %e, "Recognition failed, manual entry required");
                    None
                }
            };

            let pipeline = self.pipeline.clone();
            let fields = match tokio::task::spawn_blocking(move || pipeline.run_optional(text.as_deref())).await {
                Ok(fields) => fields,
                Err(e) => {
                    let e = ExtractionError::Task(e.to_string());
                    tracing::warn!(session = %session_id, error = %e, "Extraction task failed");
                    ExtractedFields::empty(String::new())
                }
            };

            self.complete(&ticket, fields, apply)
        }
    }

    /// `submit` with a blocking OCR engine run on the blocking pool.
    pub fn submit_image<'a, A>(
        &'a self,
        session_id: Uuid,
        engine: Arc<dyn OcrEngine>,
        image_bytes: Vec<u8>,
        apply: A,
    ) -> impl Future<Output = CaptureOutcome> + 'a
    where
        A: FnOnce(ExtractedFields) + 'a,
    {
        let recognition = async move {
            match tokio::task::spawn_blocking(move || engine.recognize(&image_bytes)).await {
                Ok(result) => result,
                Err(e) => Err(ExtractionError::Task(e.to_string())),
            }
        };
        self.submit(session_id, recognition, apply)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
