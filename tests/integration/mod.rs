//! Integration tests
//!
//! - `engine_tests`: store, hub, publisher and alarm working together
//! - `http_tests`: routes against an in-process service
//! - `config_tests`: configuration files on disk
//! - `ws_tests`: websocket sessions over a bound listener

mod config_tests;
mod engine_tests;
mod http_tests;
