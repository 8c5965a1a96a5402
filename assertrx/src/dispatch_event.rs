use serde_json::Value;

/// Ordered payload values attached to a single dispatch call.
pub type Payload = Vec<Value>;

/// One anticipated dispatch call in an expected sequence.
///
/// An expected event always names the dispatch it anticipates; attaching a
/// payload additionally pins the values the call must carry. Payload equality
/// is structural, so two payloads match when their JSON representations are
/// identical.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedEvent {
    pub name: String,
    pub payload: Option<Payload>,
}

impl ExpectedEvent {
    /// Anticipates a dispatch call by name, with no payload expectation.
    pub fn named(name: impl Into<String>) -> Self {
        ExpectedEvent {
            name: name.into(),
            payload: None,
        }
    }

    /// Attaches the ordered payload values the dispatch call must carry.
    pub fn with_payload(mut self, payload: impl IntoIterator<Item = Value>) -> Self {
        self.payload = Some(payload.into_iter().collect());
        self
    }
}

/// One recorded dispatch call.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEvent {
    pub name: String,
    pub payload: Option<Payload>,
}

impl DispatchEvent {
    pub(crate) fn new(name: impl Into<String>, payload: Option<Payload>) -> Self {
        DispatchEvent {
            name: name.into(),
            payload,
        }
    }
}
