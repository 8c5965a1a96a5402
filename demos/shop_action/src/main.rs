use crate::tracing_setup::tracing_init;
use assertrx::{expect_event, test_action, ActionContext, State};
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

mod tracing_setup;

#[derive(Debug, Clone, Default)]
struct ShopState {
    pending: bool,
}

impl State for ShopState {}

#[derive(Debug, Clone, Serialize)]
struct Product {
    id: u32,
    name: String,
}

fn shop_catalog() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "socks".to_string(),
        },
        Product {
            id: 2,
            name: "shoes".to_string(),
        },
    ]
}

// Canned stand-in for the shop backend.
async fn fetch_products() -> Vec<Product> {
    sleep(Duration::from_millis(200)).await;
    shop_catalog()
}

fn get_products(ctx: ActionContext<ShopState>, (): ()) {
    debug!("Worker | pending = {}", ctx.state().pending);
    ctx.dispatch("REQUEST_PRODUCTS");
    let dispatch = ctx.dispatcher();
    tokio::spawn(async move {
        let products = fetch_products().await;
        debug!("Worker | api returned {} products", products.len());
        dispatch.dispatch_with("RECEIVE_PRODUCTS", [json!(products)]);
    });
}

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("An async shop action must request, then receive, in that order");

    let (dispatcher, completion) = test_action(
        get_products,
        (),
        ShopState::default(),
        vec![
            expect_event!("REQUEST_PRODUCTS"),
            expect_event!("RECEIVE_PRODUCTS", shop_catalog()),
        ],
    );

    let mut stream = dispatcher.to_stream();
    while let Some(event) = stream.next().await {
        info!("  Main | observed dispatch: {}", event.name);
    }

    timeout(Duration::from_secs(1), completion.wait())
        .await
        .unwrap()
        .unwrap();

    info!(
        "  Main | sequence complete, {} call(s) recorded",
        dispatcher.calls()
    );
    info!("==========================================");
    info!("  Main | Finish");
}
