//! # Adapters Layer
//!
//! - [`LcdClient`]: production adapter over the LCD REST API
//! - [`MockChainClient`]: scripted in-memory chain for tests

pub mod lcd;
pub mod mock;

pub use lcd::{LcdClient, LCD_REQUEST_TIMEOUT};
pub use mock::MockChainClient;
