use std::time::Duration;

use assertrx::State;
use serde::Serialize;
use tokio::time::sleep;

#[derive(Clone, Debug, PartialEq)]
pub struct ShopState {
    pub pending: bool,
    pub products: Vec<Product>,
}

impl State for ShopState {}

impl Default for ShopState {
    fn default() -> Self {
        ShopState {
            pending: false,
            products: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
}

pub fn sample_products() -> Vec<Product> {
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
pub async fn fetch_products(delay: Duration) -> Vec<Product> {
    sleep(delay).await;
    sample_products()
}
