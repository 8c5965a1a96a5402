use crate::tracing_setup::tracing_init;
use assertrx::{assert_dispatch_sequence, expect_event, test_action, ActionContext, State};
use serde_json::json;
use tracing::{debug, info, warn};

mod tracing_setup;

#[derive(Debug, Clone, Default)]
struct Counter {
    count: i32,
}

impl State for Counter {}

fn increment_twice(ctx: ActionContext<Counter>, step: i32) {
    debug!(
        "Worker | dispatching from count = {}",
        ctx.state().count
    );
    ctx.dispatch_with("INCREMENT", [json!(step)]);
    ctx.dispatch_with("INCREMENT", [json!(step * 2)]);
}

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. A synchronous action is checked against its expected sequence");

    let (dispatcher, completion) = test_action(
        increment_twice,
        1,
        Counter::default(),
        vec![expect_event!("INCREMENT", 1), expect_event!("INCREMENT", 2)],
    );
    completion.wait().await.unwrap();

    for event in dispatcher.events() {
        info!("  Main | recorded: {} {:?}", event.name, event.payload);
    }

    info!("==========================================");
    warn!("B. An action that dispatches nothing completes an empty sequence at once");

    let dispatcher = assert_dispatch_sequence(
        |_ctx: ActionContext<Counter>, ()| {
            debug!("Worker | nothing to dispatch");
        },
        (),
        Counter::default(),
        vec![],
        || info!("  Main | empty sequence complete"),
    );
    info!("  Main | calls recorded: {}", dispatcher.calls());

    info!("==========================================");
    info!("  Main | Finish");
}
