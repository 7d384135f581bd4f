//! Integration tests for Sitemap-Sweep
//!
//! These tests run real HTTP traffic against wiremock servers.

mod discovery_tests;
mod sweep_tests;
