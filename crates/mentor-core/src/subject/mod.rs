//! Study subjects shown as cards on the dashboard.
//!
//! Nothing creates subjects yet, so the dashboard list is always empty.

use serde::{Deserialize, Serialize};

/// An ARGB colour, `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }
}

/// Top and bottom colour of a card's vertical gradient.
pub type Gradient = (Color, Color);

/// Card gradients, assigned round-robin.
pub const CARD_GRADIENTS: [Gradient; 5] = [
    (Color(0xFFAD5389), Color(0xFF3C1053)),
    (Color(0xFF3A6073), Color(0xFF16222A)),
    (Color(0xFFF857A6), Color(0xFFFF5858)),
    (Color(0xFF00D2FF), Color(0xFF3A7BD5)),
    (Color(0xFF99F2C8), Color(0xFF1F4037)),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub completion_status: String,
    pub color_gradient: Gradient,
    pub id: u32,
}

impl Subject {
    /// Builds a subject whose gradient is picked from [`CARD_GRADIENTS`] by id.
    pub fn new(id: u32, name: impl Into<String>, completion_status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completion_status: completion_status.into(),
            color_gradient: CARD_GRADIENTS[id as usize % CARD_GRADIENTS.len()],
            id,
        }
    }
}
