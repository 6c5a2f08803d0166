//! The persisted queue state and its ordering rules

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Pop order of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// FIFO: oldest item first
    #[default]
    Queue,
    /// LIFO: newest item first
    Stack,
}

impl Mode {
    pub fn from_stack_flag(is_stack: bool) -> Self {
        if is_stack {
            Mode::Stack
        } else {
            Mode::Queue
        }
    }

    pub fn is_stack(self) -> bool {
        self == Mode::Stack
    }
}

/// Everything cbq persists between operations
///
/// On disk this is a JSON object with `items`, `active` and `is_stack`.
/// Unknown fields are ignored and missing fields take their defaults, so
/// files written by older or newer versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueState {
    /// Pending clipboard entries, oldest first
    pub items: Vec<String>,
    /// Whether copies are currently being captured
    pub active: bool,
    #[serde(rename = "is_stack", with = "stack_flag")]
    pub mode: Mode,
}

impl QueueState {
    /// The item the next pop returns under the current mode
    pub fn front(&self) -> Option<&str> {
        match self.mode {
            Mode::Queue => self.items.first(),
            Mode::Stack => self.items.last(),
        }
        .map(String::as_str)
    }

    /// Remove the item at the front for `mode`, which may differ from `self.mode`
    pub fn take_front(&mut self, mode: Mode) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        match mode {
            Mode::Queue => Some(self.items.remove(0)),
            Mode::Stack => self.items.pop(),
        }
    }

    /// Append `item` unless it repeats the most recent entry
    ///
    /// Returns whether the item was appended.
    pub fn push_unless_repeat(&mut self, item: &str) -> bool {
        if self.items.last().is_some_and(|last| last == item) {
            return false;
        }
        self.items.push(item.to_string());
        true
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// Stored as a boolean so existing state files keep working
mod stack_flag {
    use super::Mode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &Mode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(mode.is_stack())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mode, D::Error> {
        bool::deserialize(deserializer).map(Mode::from_stack_flag)
    }
}
