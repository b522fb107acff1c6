//! tubecat - channel metadata scraper with an on-disk JSON catalog.
//!
//! Extracts channel identity and video listings from dynamically rendered,
//! lazily loaded channel pages, tolerating an unstable document structure
//! through ranked fallback selectors, and persists the results into a
//! deduplicated per-channel catalog with a top-level index.

pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod scrape;
pub mod surface;
