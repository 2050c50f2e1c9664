//! The frame-scheduling port.
//!
//! The driver never loops on its own. It asks a [`FrameScheduler`] for the
//! next frame and gets a [`FrameToken`] back; when the host fires that token
//! the driver runs one step. Restarting a session cancels the outstanding
//! token first, so a frame requested for an old session can never run.
//!
//! [`ManualScheduler`] is the in-process implementation: the host (a test, or
//! the gallery's UI loop) calls [`ManualScheduler::fire`] when it is ready to
//! draw.

use std::collections::VecDeque;
use std::fmt;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can call back for the next display frame.
pub trait FrameScheduler {
    /// Request one frame. The returned token identifies the callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a requested frame. Cancelling a fired or unknown token is a no-op.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Scheduler driven by explicit [`fire`](ManualScheduler::fire) calls.
#[derive(Default)]
pub struct ManualScheduler {
    next: u64,
    pending: VecDeque<FrameToken>,
    requested: u64,
    cancelled: u64,
    waker: Option<Box<dyn FnMut() + Send>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `waker` every time a frame is requested, e.g. to ask a UI for a repaint.
    pub fn with_waker(waker: impl FnMut() + Send + 'static) -> Self {
        Self { waker: Some(Box::new(waker)), ..Self::default() }
    }

    /// Hand out the oldest pending token, if any.
    pub fn fire(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    /// Tokens requested and not yet fired or cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    /// Total frames ever requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled while still pending.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next);
        self.next += 1;
        self.requested += 1;
        self.pending.push_back(token);
        if let Some(waker) = self.waker.as_mut() {
            waker();
        }
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.pending.len();
        self.pending.retain(|t| *t != token);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending)
            .field("requested", &self.requested)
            .field("cancelled", &self.cancelled)
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fire_in_request_order() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.fire(), Some(a));
        assert_eq!(s.fire(), Some(b));
        assert_eq!(s.fire(), None);
    }

    #[test]
    fn test_cancelled_token_never_fires() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        s.cancel_frame(a);
        assert_eq!(s.cancelled(), 1);
        assert_eq!(s.fire(), None);

        // cancelling again is harmless
        s.cancel_frame(a);
        assert_eq!(s.cancelled(), 1);
    }

    #[test]
    fn test_waker_runs_per_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let mut s = ManualScheduler::with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        s.request_frame();
        s.request_frame();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(s.requested(), 2);
    }
}
