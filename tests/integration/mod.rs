//! Integration test modules.

mod clock_shift_test;
mod query_flow_test;
