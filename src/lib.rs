//! PolySniper: a Polymarket opportunity scanner.
//!
//! Fetches open events from the Gamma API, flattens them into per-market
//! rows, derives urgency metrics, filters and ranks them, and optionally
//! runs an LLM manipulation-risk audit per market.

pub mod audit;
pub mod cache;
pub mod config;
pub mod market;
pub mod monitoring;
pub mod render;
