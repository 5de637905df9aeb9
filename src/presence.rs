//! Rich presence payload model
//!
//! The presence object is sent as the `activity` argument of a
//! SET_ACTIVITY command. Unset fields are omitted from the wire JSON
//! entirely; Discord rejects empty strings in asset fields, which the
//! builder validates up front.

use serde::Serialize;

use crate::errors::IpcError;

/// A rich presence status to publish to Discord.
#[derive(Debug, Clone, Serialize)]
pub struct RichPresence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Secrets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

/// Unix timestamps in seconds, shown by Discord as elapsed/remaining time.
#[derive(Debug, Clone, Serialize)]
pub struct Timestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// Image keys registered with the Discord application, plus hover texts.
#[derive(Debug, Clone, Serialize)]
pub struct Assets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

/// Party membership info: `size` is `[current, max]` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct Party {
    pub id: String,
    pub size: [u32; 2],
}

/// Join/spectate/match secrets for the activity flows.
#[derive(Debug, Clone, Serialize)]
pub struct Secrets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#match: Option<String>,
}

/// A clickable button below the presence.
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub label: String,
    pub url: String,
}

impl RichPresence {
    pub fn builder() -> RichPresenceBuilder {
        RichPresenceBuilder::default()
    }
}

/// Fluent builder for [`RichPresence`].
#[derive(Debug, Default)]
pub struct RichPresenceBuilder {
    state: Option<String>,
    details: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
    large_image: Option<(String, String)>,
    small_image: Option<(String, String)>,
    party: Option<(String, u32, u32)>,
    join: Option<String>,
    spectate: Option<String>,
    match_secret: Option<String>,
    buttons: Vec<Button>,
}

impl RichPresenceBuilder {
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Unix timestamp (seconds) the activity started at.
    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    /// Unix timestamp (seconds) the activity ends at.
    pub fn end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    /// Large image key and its hover text. Both are required together and
    /// must be non-empty.
    pub fn large_image(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.large_image = Some((key.into(), text.into()));
        self
    }

    /// Small image key and its hover text. Both are required together and
    /// must be non-empty.
    pub fn small_image(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.small_image = Some((key.into(), text.into()));
        self
    }

    pub fn party(mut self, id: impl Into<String>, size: u32, max: u32) -> Self {
        self.party = Some((id.into(), size, max));
        self
    }

    pub fn join_secret(mut self, secret: impl Into<String>) -> Self {
        self.join = Some(secret.into());
        self
    }

    pub fn spectate_secret(mut self, secret: impl Into<String>) -> Self {
        self.spectate = Some(secret.into());
        self
    }

    pub fn match_secret(mut self, secret: impl Into<String>) -> Self {
        self.match_secret = Some(secret.into());
        self
    }

    /// Append a button. Discord displays at most two.
    pub fn button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    /// Build the presence, validating that no asset key or text is empty.
    pub fn build(self) -> Result<RichPresence, IpcError> {
        for (key, text) in self.large_image.iter().chain(self.small_image.iter()) {
            if key.is_empty() || text.is_empty() {
                return Err(IpcError::InvalidPresence(
                    "image keys and hover texts must not be empty strings".to_string(),
                ));
            }
        }

        let timestamps = if self.start.is_some() || self.end.is_some() {
            Some(Timestamps {
                start: self.start,
                end: self.end,
            })
        } else {
            None
        };

        let assets = if self.large_image.is_some() || self.small_image.is_some() {
            let (large_image, large_text) = self.large_image.map_or((None, None), |(k, t)| {
                (Some(k), Some(t))
            });
            let (small_image, small_text) = self.small_image.map_or((None, None), |(k, t)| {
                (Some(k), Some(t))
            });
            Some(Assets {
                large_image,
                large_text,
                small_image,
                small_text,
            })
        } else {
            None
        };

        let party = self.party.map(|(id, size, max)| Party {
            id,
            size: [size, max],
        });

        let secrets = if self.join.is_some() || self.spectate.is_some() || self.match_secret.is_some()
        {
            Some(Secrets {
                join: self.join,
                spectate: self.spectate,
                r#match: self.match_secret,
            })
        } else {
            None
        };

        Ok(RichPresence {
            state: self.state,
            details: self.details,
            timestamps,
            assets,
            party,
            secrets,
            buttons: if self.buttons.is_empty() {
                None
            } else {
                Some(self.buttons)
            },
        })
    }
}
