//! Roster API Library
//!
//! This library provides the core functionality for the roster search API,
//! including domain logic, repositories, and infrastructure components.

pub mod api;
pub mod domain;
pub mod infrastructure;
