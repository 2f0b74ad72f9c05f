//! Integration tests for Catalog-Relay
//!
//! These tests use wiremock to stand up a mock catalog site and a mock API
//! host and drive the harvest and relay phases end-to-end.

mod catalog_tests;
mod pipeline_tests;
mod relay_tests;
mod support;
