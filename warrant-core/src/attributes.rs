// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optional display decorations attached to a subject or a group.
///
/// A slot holding an empty string counts as unset: it never wins a merge and does not make a set
/// non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AttributeSet {
    pub chat_prefix: Option<String>,
    pub chat_suffix: Option<String>,
    pub label_prefix: Option<String>,
    pub label_suffix: Option<String>,
}

impl AttributeSet {
    /// The canonical empty set with all four slots unset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_chat_prefix(mut self, value: impl Into<String>) -> Self {
        self.chat_prefix = Some(value.into());
        self
    }

    pub fn with_chat_suffix(mut self, value: impl Into<String>) -> Self {
        self.chat_suffix = Some(value.into());
        self
    }

    pub fn with_label_prefix(mut self, value: impl Into<String>) -> Self {
        self.label_prefix = Some(value.into());
        self
    }

    pub fn with_label_suffix(mut self, value: impl Into<String>) -> Self {
        self.label_suffix = Some(value.into());
        self
    }

    pub fn chat_prefix(&self) -> Option<&str> {
        slot(&self.chat_prefix)
    }

    pub fn chat_suffix(&self) -> Option<&str> {
        slot(&self.chat_suffix)
    }

    pub fn label_prefix(&self) -> Option<&str> {
        slot(&self.label_prefix)
    }

    pub fn label_suffix(&self) -> Option<&str> {
        slot(&self.label_suffix)
    }

    /// Returns `true` if no slot holds a value.
    pub fn is_empty(&self) -> bool {
        self.chat_prefix().is_none()
            && self.chat_suffix().is_none()
            && self.label_prefix().is_none()
            && self.label_suffix().is_none()
    }

    /// Layer `self` over `fallback`, slot by slot.
    ///
    /// Every slot keeps the value of `self` if it is set and takes the one of `fallback`
    /// otherwise.
    pub fn merge(self, fallback: &AttributeSet) -> AttributeSet {
        AttributeSet {
            chat_prefix: pick(self.chat_prefix, &fallback.chat_prefix),
            chat_suffix: pick(self.chat_suffix, &fallback.chat_suffix),
            label_prefix: pick(self.label_prefix, &fallback.label_prefix),
            label_suffix: pick(self.label_suffix, &fallback.label_suffix),
        }
    }
}

fn slot(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn pick(primary: Option<String>, fallback: &Option<String>) -> Option<String> {
    match primary {
        Some(value) if !value.is_empty() => Some(value),
        _ => slot(fallback).map(str::to_owned),
    }
}
