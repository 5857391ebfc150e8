//! Tests that run the `ctk` binary.

pub mod common;
pub mod exec_test;
