// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Confab chat service.
//!
//! Exposes [`ChatStore`], a typed facade over an async SQLite connection.
//! Schema changes are embedded refinery migrations that run on open.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod store;

pub use store::ChatStore;
