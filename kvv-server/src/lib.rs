//! KVV departures gateway.
//!
//! A small HTTP service in front of the KVV EFA endpoints: stop search,
//! live departures with a short-lived cache, and optional persistence of
//! discovered stops to PostGIS.

pub mod cache;
pub mod config;
pub mod domain;
pub mod efa;
pub mod persistence;
pub mod web;
