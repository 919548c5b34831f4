//! EKart Core - Shared types library.
//!
//! This crate provides common types used across EKart frontend components:
//! - `storefront` - Customer- and seller-facing web frontend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every entity
//! here is a transient, request-scoped copy of data owned and persisted by the
//! external EKart backend API.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
