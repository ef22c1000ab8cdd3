//! Room model.

use serde::{Deserialize, Serialize};

/// A lecture room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name.
    pub id: String,
    /// Number of seats.
    pub capacity: u32,
}

impl Room {
    /// Creates a room with the given capacity.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }

    /// Whether `enrollment` students fit.
    #[inline]
    pub fn fits(&self, enrollment: u32) -> bool {
        self.capacity >= enrollment
    }
}
