use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::event_stream::DispatchStream;
use crate::{DispatchEvent, ExpectedEvent, Payload, SequenceError};

pub(crate) type CompletionHook = Box<dyn FnOnce() + Send>;

struct Shared {
    expected: Vec<ExpectedEvent>,
    count: usize,
    history: Vec<DispatchEvent>,
    failure: Option<SequenceError>,
    on_complete: Option<CompletionHook>,
    taps: Vec<UnboundedSender<DispatchEvent>>,
}

impl Shared {
    fn is_terminal(&self) -> bool {
        self.count == self.expected.len() || self.failure.is_some()
    }
}

/// The recording dispatch capability handed to an action under test.
///
/// Each call is checked against the next event of the expected sequence; the
/// first divergence fails the test at the offending call. The handle is cheap
/// to clone and safe to move into spawned tasks, so actions may dispatch
/// synchronously or after an arbitrary delay.
pub struct Dispatcher {
    shared: Arc<Mutex<Shared>>,
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Dispatcher {
            shared: self.shared.clone(),
        }
    }
}

impl Dispatcher {
    pub fn new(expected: Vec<ExpectedEvent>) -> Self {
        Dispatcher {
            shared: Arc::new(Mutex::new(Shared {
                expected,
                count: 0,
                history: Vec::new(),
                failure: None,
                on_complete: None,
                taps: Vec::new(),
            })),
        }
    }

    pub(crate) fn set_on_complete(&self, hook: CompletionHook) {
        let mut shared = self.shared.lock().unwrap();
        shared.on_complete = Some(hook);
    }

    /// Records a dispatch call with no payload, panicking on mismatch.
    pub fn dispatch(&self, name: impl AsRef<str>) {
        if let Err(err) = self.try_dispatch(name) {
            panic!("dispatch assertion failed: {err}");
        }
    }

    /// Records a dispatch call carrying a payload, panicking on mismatch.
    pub fn dispatch_with(&self, name: impl AsRef<str>, payload: impl IntoIterator<Item = Value>) {
        if let Err(err) = self.try_dispatch_with(name, payload) {
            panic!("dispatch assertion failed: {err}");
        }
    }

    pub fn try_dispatch(&self, name: impl AsRef<str>) -> Result<(), SequenceError> {
        self.record(name.as_ref(), None)
    }

    pub fn try_dispatch_with(
        &self,
        name: impl AsRef<str>,
        payload: impl IntoIterator<Item = Value>,
    ) -> Result<(), SequenceError> {
        self.record(name.as_ref(), Some(payload.into_iter().collect()))
    }

    fn record(&self, name: &str, payload: Option<Payload>) -> Result<(), SequenceError> {
        let hook = {
            let mut shared = self.shared.lock().unwrap();
            let index = shared.count;

            if index >= shared.expected.len() {
                let err = SequenceError::UnexpectedExtraDispatch {
                    index,
                    name: name.to_string(),
                    expected_len: shared.expected.len(),
                };
                return Err(Self::fail(&mut shared, err));
            }

            let expected = &shared.expected[index];
            if expected.name != name {
                let err = SequenceError::OrderMismatch {
                    index,
                    expected: expected.name.clone(),
                    actual: name.to_string(),
                };
                return Err(Self::fail(&mut shared, err));
            }

            // The payload check is driven by the call: a payload-less call is
            // never payload-checked, even against an expectation that has one.
            if let Some(payload) = &payload {
                if expected.payload.as_ref() != Some(payload) {
                    let err = SequenceError::PayloadMismatch {
                        index,
                        name: name.to_string(),
                        expected: expected.payload.clone(),
                        actual: payload.clone(),
                    };
                    return Err(Self::fail(&mut shared, err));
                }
            }

            let event = DispatchEvent::new(name, payload);
            shared.count += 1;
            shared.history.push(event.clone());
            shared.taps.retain(|tap| tap.send(event.clone()).is_ok());

            if shared.count == shared.expected.len() {
                shared.taps.clear();
                shared.on_complete.take()
            } else {
                None
            }
        };

        // The hook runs outside the lock so it may inspect this dispatcher.
        if let Some(hook) = hook {
            hook();
        }
        Ok(())
    }

    fn fail(shared: &mut Shared, err: SequenceError) -> SequenceError {
        if shared.failure.is_none() {
            shared.failure = Some(err.clone());
        }
        shared.taps.clear();
        err
    }

    /// Number of dispatch calls recorded so far.
    pub fn calls(&self) -> usize {
        self.shared.lock().unwrap().count
    }

    /// Number of events the sequence expects in total.
    pub fn expected_len(&self) -> usize {
        self.shared.lock().unwrap().expected.len()
    }

    /// The recorded dispatch calls, in order.
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.shared.lock().unwrap().history.clone()
    }

    /// True once every expected event has been observed.
    pub fn is_complete(&self) -> bool {
        let shared = self.shared.lock().unwrap();
        shared.count == shared.expected.len()
    }

    /// The first mismatch recorded by this dispatcher, if any.
    pub fn failure(&self) -> Option<SequenceError> {
        self.shared.lock().unwrap().failure.clone()
    }

    /// Observes recorded dispatch calls as an async stream.
    ///
    /// Calls recorded before this point are replayed first; later calls
    /// arrive as the action makes them. The stream ends once the sequence
    /// completes or fails.
    pub fn to_stream(&self) -> DispatchStream {
        let (tx, rx) = unbounded_channel();
        {
            let mut shared = self.shared.lock().unwrap();
            for event in &shared.history {
                let _ = tx.send(event.clone());
            }
            if !shared.is_terminal() {
                shared.taps.push(tx);
            }
        }
        DispatchStream::new(rx)
    }

    // Terminal path for an empty expected sequence: nothing may have been
    // dispatched, and completion fires without waiting for any call.
    pub(crate) fn finish_empty(&self) {
        let calls = self.calls();
        assert_eq!(
            calls, 0,
            "expected an empty dispatch sequence, but {calls} call(s) were recorded"
        );
        let hook = self.shared.lock().unwrap().on_complete.take();
        if let Some(hook) = hook {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn two_step() -> Vec<ExpectedEvent> {
        vec![
            ExpectedEvent::named("REQUEST_PRODUCTS"),
            ExpectedEvent::named("RECEIVE_PRODUCTS").with_payload([json!(["socks", "shoes"])]),
        ]
    }

    #[test]
    fn test_matching_sequence_completes() {
        let completions = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(two_step());
        let counter = completions.clone();
        dispatcher.set_on_complete(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        dispatcher.try_dispatch("REQUEST_PRODUCTS").unwrap();
        assert_eq!(completions.load(Ordering::SeqCst), 0);
        assert!(!dispatcher.is_complete());

        dispatcher
            .try_dispatch_with("RECEIVE_PRODUCTS", [json!(["socks", "shoes"])])
            .unwrap();
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert!(dispatcher.is_complete());
        assert_eq!(dispatcher.calls(), 2);
        assert!(dispatcher.failure().is_none());
    }

    #[test]
    fn test_order_mismatch() {
        let dispatcher = Dispatcher::new(two_step());
        let err = dispatcher.try_dispatch("WRONG_NAME").unwrap_err();
        assert_eq!(
            err,
            SequenceError::OrderMismatch {
                index: 0,
                expected: "REQUEST_PRODUCTS".to_string(),
                actual: "WRONG_NAME".to_string(),
            }
        );
        assert_eq!(dispatcher.failure(), Some(err));
        assert_eq!(dispatcher.calls(), 0);
    }

    #[test]
    fn test_payload_mismatch() {
        let dispatcher = Dispatcher::new(two_step());
        dispatcher.try_dispatch("REQUEST_PRODUCTS").unwrap();

        let err = dispatcher
            .try_dispatch_with("RECEIVE_PRODUCTS", [json!(["hats"])])
            .unwrap_err();
        assert!(err.is_payload_mismatch());
        assert!(!dispatcher.is_complete());
    }

    #[test]
    fn test_payload_check_skipped_without_call_payload() {
        let dispatcher = Dispatcher::new(two_step());
        dispatcher.try_dispatch("REQUEST_PRODUCTS").unwrap();

        // A payload-less call passes even though the expectation carries one.
        dispatcher.try_dispatch("RECEIVE_PRODUCTS").unwrap();
        assert!(dispatcher.is_complete());
    }

    #[test]
    fn test_extra_dispatch_fails_fast() {
        let dispatcher = Dispatcher::new(vec![ExpectedEvent::named("ONLY")]);
        dispatcher.try_dispatch("ONLY").unwrap();

        let err = dispatcher.try_dispatch("ONLY").unwrap_err();
        assert_eq!(
            err,
            SequenceError::UnexpectedExtraDispatch {
                index: 1,
                name: "ONLY".to_string(),
                expected_len: 1,
            }
        );
        // The successful prefix stays recorded.
        assert_eq!(dispatcher.calls(), 1);
    }

    #[test]
    fn test_history_keeps_call_order() {
        let dispatcher = Dispatcher::new(two_step());
        dispatcher.try_dispatch("REQUEST_PRODUCTS").unwrap();
        dispatcher
            .try_dispatch_with("RECEIVE_PRODUCTS", [json!(["socks", "shoes"])])
            .unwrap();

        let events = dispatcher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "REQUEST_PRODUCTS");
        assert_eq!(events[0].payload, None);
        assert_eq!(events[1].name, "RECEIVE_PRODUCTS");
        assert_eq!(events[1].payload, Some(vec![json!(["socks", "shoes"])]));
    }

    #[test]
    #[should_panic(expected = "expected `REQUEST_PRODUCTS`, got `WRONG_NAME`")]
    fn test_dispatch_panics_on_mismatch() {
        let dispatcher = Dispatcher::new(two_step());
        dispatcher.dispatch("WRONG_NAME");
    }
}
