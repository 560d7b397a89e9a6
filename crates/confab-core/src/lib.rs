// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types, traits, and error taxonomy shared across all Confab crates.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ConfabError;
