//! Discord API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rich embed attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Link applied to the title.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,

    /// Accent color as `0xRRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail: Option<EmbedThumbnail>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Append a field.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// The bot account behind a token (`GET /users/@me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Snowflake ID.
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// A message created in a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID.
    pub id: String,
    pub channel_id: String,
}

/// Request body for `POST /channels/{id}/messages`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateMessage<'a> {
    pub embeds: [&'a Embed; 1],
}
