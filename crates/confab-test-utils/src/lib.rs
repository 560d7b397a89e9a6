// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Confab integration tests.
//!
//! Provides scripted providers and harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockTextGenerator`] - Scripted text provider with pre-configured replies
//! - [`MockImageGenerator`] - Scripted image provider with pre-configured data URLs
//! - [`TestHarness`] - Chat service wired to a throwaway SQLite database

pub mod harness;
pub mod mock_image;
pub mod mock_text;

pub use harness::TestHarness;
pub use mock_image::MockImageGenerator;
pub use mock_text::MockTextGenerator;
