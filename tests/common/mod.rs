//! Common test utilities for wake-me-up
//!
//! # Usage
//!
//! ```rust
//! use crate::common::fixtures::PayloadFactory;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let store = wake_me_up::AlertStore::new(10);
//!     store.ingest(PayloadFactory::firing(&["DiskFull"]));
//!     // ...
//! }
//! ```

pub mod fixtures;

// Re-export commonly used items
pub use assertions::SnapshotAssertions;
pub use fixtures::{AlertFactory, FakePlayer, PayloadFactory, TestService};

use std::time::Duration;

/// Poll `condition` every 10ms for up to two seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
