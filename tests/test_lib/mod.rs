//! Common library module for integration tests
// See https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

use std::path::PathBuf;

use serde::Deserialize;

/// Enables log output for the current test
///
/// Log output is captured by the test harness and only shown for failing tests;
/// use the `RUST_LOG` environment variable to choose the level, for example `RUST_LOG=trace`.
pub fn init_logger() {
    // Ignore the error when the logger was already initialized by another test
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn get_test_data_file_path() -> PathBuf {
    // Get path of test file, see https://stackoverflow.com/a/30004252
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/test_data.json");
    path
}

/// An order item of the document at the path returned by [`get_test_data_file_path`]
#[derive(Deserialize, PartialEq, Debug)]
pub struct OrderItem {
    pub sku: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An order of the document at the path returned by [`get_test_data_file_path`]
#[derive(Deserialize, PartialEq, Debug)]
pub struct Order {
    pub id: u64,
    pub customer: String,
    pub items: Vec<OrderItem>,
}

/// Document structure of [`get_test_data_file_path`], for comparison with Serde JSON
#[derive(Deserialize, PartialEq, Debug)]
pub struct OrdersDocument {
    pub orders: Vec<Order>,
}
