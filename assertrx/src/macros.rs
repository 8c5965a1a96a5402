#[macro_export]
macro_rules! expect_event {
    // Name only, no payload expectation
    ($name:expr $(,)?) => {
        $crate::ExpectedEvent::named($name)
    };

    // Name plus the ordered payload values the call must carry
    ($name:expr, $($value:expr),+ $(,)?) => {
        $crate::ExpectedEvent::named($name)
            .with_payload([$(::serde_json::json!($value)),+])
    };
}
