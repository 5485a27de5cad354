//! The safe zone: an optional global restriction for input injection.
//!
//! Storage only — consuming components (the dispatcher, pointer/keyboard
//! providers) consult the active restriction and reject or clamp coordinates;
//! this type performs no enforcement itself.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// A rectangular region in screen or window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

impl Region {
    /// Whether the point lies inside this region.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x.saturating_add(self.width)
            && y < self.y.saturating_add(self.height)
    }
}

/// The active restriction: a window identifier plus an optional region
/// within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeZoneConfig {
    /// Identifier of the window input is confined to.
    pub window: String,
    /// Optional rectangular region within the window.
    pub region: Option<Region>,
}

/// Single global safe-zone slot, last-writer-wins.
#[derive(Debug, Default)]
pub struct SafeZone {
    current: RwLock<Option<SafeZoneConfig>>,
}

impl SafeZone {
    /// Create an unrestricted safe zone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a restriction, replacing any previous one.
    pub fn set(&self, window: impl Into<String>, region: Option<Region>) {
        let config = SafeZoneConfig {
            window: window.into(),
            region,
        };
        tracing::info!(window = %config.window, ?region, "safe zone set");
        *self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(config);
    }

    /// Remove the restriction, returning to unrestricted.
    pub fn clear(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }

    /// The active restriction, or `None` when unrestricted.
    #[must_use]
    pub fn current(&self) -> Option<SafeZoneConfig> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
