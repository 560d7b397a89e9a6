// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types for the Confab chat service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Prefix that routes a submission to image generation.
pub const IMAGE_COMMAND_PREFIX: &str = "/imagine ";

/// Prefix stored in front of the data URL of a generated image reply.
pub const IMAGE_REPLY_PREFIX: &str = "Generated image: ";

/// Returns the image prompt when `input` is an image command.
///
/// The remainder after the prefix is the prompt, even when empty. Input
/// without the trailing space (`/imagine`) is ordinary text.
pub fn image_prompt(input: &str) -> Option<&str> {
    input.strip_prefix(IMAGE_COMMAND_PREFIX)
}

/// Author of a [`ChatTurn`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One immutable entry in a user's conversation history.
///
/// `id` and `created_at` are assigned by the store on insert. History is
/// append-only; turns are never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    pub user_id: String,
    pub role: TurnRole,
    pub content: String,
    /// UTC timestamp in ISO-8601 with millisecond precision.
    pub created_at: String,
}

/// Authenticated caller identity established by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable subject identifier; the partition key for history.
    pub subject: String,
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: None,
        }
    }
}
