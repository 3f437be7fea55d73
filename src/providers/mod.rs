//! Per-venue fetchers and normalizers.
//!
//! This module handles:
//! - Raw payload models for each provider's API shape
//! - Pure normalizers from raw payloads to [`crate::market::Market`]
//! - The fetch client that joins all providers per refresh cycle
//!
//! Normalizers are total over their payloads: records that cannot be
//! reduced to a binary yes/no quote are dropped, never errored.

pub mod client;
pub mod manifold;
pub mod metaculus;
pub mod polymarket;

pub use client::ProviderClient;
