//! Shared helpers for the gateway boundary types.

pub mod datetime;
