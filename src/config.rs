//! Ambient configuration shared across contexts decoding with the same
//! schema set.
//!
//! A single buffer or [`crate::octet::Decoder`]/[`crate::octet::Encoder`]
//! carries no thread-safety guarantee of its own, but a [`Config`] is
//! explicitly meant to be read from several contexts at once — a schema
//! registry keyed by message name, for instance — so its mutable corner
//! (`message_limits`) is held behind a [`parking_lot::RwLock`].

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smartstring::{LazyCompact, SmartString};
use std::sync::Arc;

type FixString = SmartString<LazyCompact>;

/// Per-message-type overrides layered on top of the ambient [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct MessageLimits {
    /// Overrides [`Config::max_message_size`] for this message type.
    pub max_message_size: Option<usize>,
    /// Overrides [`Config::strict_tag_checking`] for this message type.
    pub strict_tag_checking: Option<bool>,
}

/// Ambient limits and policy knobs a codec consults but never mutates
/// mid-decode.
#[derive(Clone)]
pub struct Config {
    /// Upper bound on a single message's encoded size, in bytes.
    pub max_message_size: usize,
    /// Upper bound on container nesting depth (Sequence/Set/Choice inside
    /// one another) before decode gives up rather than recursing further.
    pub max_container_depth: u32,
    /// If true, a decoded tag that doesn't match any schema-declared tag is
    /// always `UnknownTag`, even where a caller-supplied unknown-tag handler
    /// could otherwise tolerate it (§4.6 step 5).
    pub strict_tag_checking: bool,
    /// Filler byte used by a [`crate::padding::Padding`] that doesn't
    /// specify its own.
    pub default_padding_filler: u8,
    per_message: Arc<RwLock<FxHashMap<FixString, MessageLimits>>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_size: 64 * 1024,
            max_container_depth: 32,
            strict_tag_checking: true,
            default_padding_filler: 0,
            per_message: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }
}

impl Config {
    /// Strict preset: reject any tag not named by the schema, and cap
    /// nesting tightly. Appropriate for wire formats from untrusted peers.
    pub fn strict() -> Self {
        Self { strict_tag_checking: true, max_container_depth: 16, ..Default::default() }
    }

    /// Lenient preset: tolerate unknown tags via a fallback handler and
    /// allow deeper nesting. Appropriate for internal, already-validated
    /// message sources.
    pub fn lenient() -> Self {
        Self { strict_tag_checking: false, max_container_depth: 64, ..Default::default() }
    }

    /// Installs per-message-type overrides.
    pub fn set_message_limits(&self, message_type: impl Into<FixString>, limits: MessageLimits) {
        self.per_message.write().insert(message_type.into(), limits);
    }

    /// Reads per-message-type overrides, if any were set.
    pub fn message_limits(&self, message_type: &str) -> Option<MessageLimits> {
        self.per_message.read().get(message_type).copied()
    }

    /// Resolves the effective size cap for `message_type`: its own override
    /// if set, otherwise [`Self::max_message_size`].
    pub fn effective_max_size(&self, message_type: &str) -> usize {
        self.message_limits(message_type)
            .and_then(|l| l.max_message_size)
            .unwrap_or(self.max_message_size)
    }
}
