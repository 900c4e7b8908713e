//! End-to-end membership resolution scenarios.
//!
//! Each module drives the public resolvers over an in-memory directory
//! shaped like a small Active Directory domain.

mod facade;
mod group_users;
mod user_groups;
