//! Rendering contract between the transcript and a front end.
//!
//! Front ends never decide on their own how a turn is interpreted. They ask
//! for a [`RenderedTurn`] and paint it: assistant turns are markdown with
//! GFM and math enabled, user turns are literal text.

use crate::chat::{Role, Turn};
use serde::Serialize;

/// How hyperlinks in rendered markdown must behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkPolicy {
    /// Open in a new browsing context.
    pub new_context: bool,
    /// Do not send referrer information to the destination.
    pub no_referrer: bool,
}

impl LinkPolicy {
    pub const EXTERNAL: Self = Self {
        new_context: true,
        no_referrer: true,
    };

    /// HTML anchor attributes implementing this policy.
    pub fn anchor_attributes(&self) -> Vec<(&'static str, &'static str)> {
        let mut attrs = Vec::new();
        if self.new_context {
            attrs.push(("target", "_blank"));
        }
        if self.no_referrer {
            attrs.push(("rel", "noreferrer"));
        }
        attrs
    }
}

/// Markdown renderer configuration for assistant content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkdownOptions {
    pub gfm: bool,
    pub math: bool,
    pub links: LinkPolicy,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            math: true,
            links: LinkPolicy::EXTERNAL,
        }
    }
}

/// A turn as it must be handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedTurn<'a> {
    /// Rich text; `source` is passed to a markdown renderer as is.
    Markdown {
        source: &'a str,
        options: MarkdownOptions,
    },
    /// Literal text; must never be interpreted as markup.
    Literal { text: &'a str },
}

impl<'a> RenderedTurn<'a> {
    pub fn from_turn(turn: &'a Turn) -> Self {
        match turn.role() {
            Role::Assistant => Self::Markdown {
                source: turn.content(),
                options: MarkdownOptions::default(),
            },
            Role::User => Self::Literal {
                text: turn.content(),
            },
        }
    }
}
