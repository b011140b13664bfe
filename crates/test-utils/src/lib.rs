//! Shared fixtures for wfs-client tests.

pub mod fixtures;
