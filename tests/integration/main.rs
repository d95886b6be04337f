//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run both
//! harvest phases end-to-end.

mod articles_tests;
