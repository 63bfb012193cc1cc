//! Integration tests for launch-oracle

mod balance_test;
mod config_test;
mod scenarios_test;
mod session_test;
