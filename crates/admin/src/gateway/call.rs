//! Per-call lifecycle.
//!
//! A call is replayed at most once after a session renewal. The replay marker
//! is the type parameter of [`OutboundCall`]: only `OutboundCall<Fresh>` has
//! [`OutboundCall::into_replay`], and it consumes the call, so a second
//! renewal for the same logical request cannot be written.

use std::marker::PhantomData;

use super::request::RequestDescriptor;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Fresh {}
    impl Sealed for super::Replayed {}
}

/// Replay stage of an outbound call.
pub trait Stage: sealed::Sealed {
    const REPLAYED: bool;
}

/// Never sent after a renewal.
#[derive(Debug)]
pub struct Fresh;

/// Re-issued after a renewal; any further 401 is final.
#[derive(Debug)]
pub struct Replayed;

impl Stage for Fresh {
    const REPLAYED: bool = false;
}

impl Stage for Replayed {
    const REPLAYED: bool = true;
}

/// Lifecycle states of a call.
///
/// `Initial -> Sent -> (Success | RenewalPending -> (SentRetry -> Success | Failed) | Failed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Initial,
    Sent,
    RenewalPending,
    SentRetry,
    Success,
    Failed,
}

impl CallState {
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initial, Self::Sent)
                | (Self::Sent, Self::Success | Self::Failed | Self::RenewalPending)
                | (Self::RenewalPending, Self::SentRetry | Self::Failed)
                | (Self::SentRetry, Self::Success | Self::Failed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// States a call has been through, in order.
#[derive(Debug, Clone)]
pub struct CallTrace {
    states: Vec<CallState>,
}

impl Default for CallTrace {
    fn default() -> Self {
        Self {
            states: vec![CallState::Initial],
        }
    }
}

impl CallTrace {
    #[must_use]
    pub fn current(&self) -> CallState {
        self.states.last().copied().unwrap_or(CallState::Initial)
    }

    pub fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.current().can_advance_to(next),
            "illegal call transition {:?} -> {next:?}",
            self.current()
        );
        self.states.push(next);
    }

    #[must_use]
    pub fn states(&self) -> &[CallState] {
        &self.states
    }
}

/// A logical request together with its replay stage and trace.
#[derive(Debug)]
pub struct OutboundCall<S: Stage> {
    descriptor: RequestDescriptor,
    trace: CallTrace,
    _stage: PhantomData<S>,
}

impl OutboundCall<Fresh> {
    #[must_use]
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            trace: CallTrace::default(),
            _stage: PhantomData,
        }
    }

    /// Mark the call for its single replay.
    #[must_use]
    pub fn into_replay(mut self) -> OutboundCall<Replayed> {
        self.trace.advance(CallState::RenewalPending);
        OutboundCall {
            descriptor: self.descriptor,
            trace: self.trace,
            _stage: PhantomData,
        }
    }
}

impl<S: Stage> OutboundCall<S> {
    #[must_use]
    pub const fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn is_replayed(&self) -> bool {
        S::REPLAYED
    }

    #[must_use]
    pub const fn trace(&self) -> &CallTrace {
        &self.trace
    }

    /// Record that the request went out.
    pub(crate) fn mark_sent(&mut self) {
        let next = if S::REPLAYED {
            CallState::SentRetry
        } else {
            CallState::Sent
        };
        self.trace.advance(next);
    }

    pub(crate) fn finish(&mut self, success: bool) {
        let next = if success {
            CallState::Success
        } else {
            CallState::Failed
        };
        self.trace.advance(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use CallState::{Failed, Initial, RenewalPending, Sent, SentRetry, Success};

        assert!(Initial.can_advance_to(Sent));
        assert!(Sent.can_advance_to(RenewalPending));
        assert!(RenewalPending.can_advance_to(SentRetry));
        assert!(RenewalPending.can_advance_to(Failed));
        assert!(SentRetry.can_advance_to(Success));

        assert!(!SentRetry.can_advance_to(RenewalPending));
        assert!(!Initial.can_advance_to(SentRetry));
        assert!(!Success.can_advance_to(Sent));
        assert!(!Failed.can_advance_to(Sent));
    }

    #[test]
    fn test_replayed_call_path() {
        let mut call = OutboundCall::new(RequestDescriptor::get("/user/all-users"));
        assert!(!call.is_replayed());
        call.mark_sent();

        let mut call = call.into_replay();
        assert!(call.is_replayed());
        call.mark_sent();
        call.finish(true);

        assert_eq!(
            call.trace().states(),
            &[
                CallState::Initial,
                CallState::Sent,
                CallState::RenewalPending,
                CallState::SentRetry,
                CallState::Success,
            ]
        );
        assert!(call.trace().current().is_terminal());
    }

    #[test]
    fn test_direct_success_path() {
        let mut call = OutboundCall::new(RequestDescriptor::get("/rank/find-all"));
        call.mark_sent();
        call.finish(true);
        assert_eq!(
            call.trace().states(),
            &[CallState::Initial, CallState::Sent, CallState::Success]
        );
    }
}
