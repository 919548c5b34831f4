//! Supporting services for route handlers.

pub mod hydration;
