//! Transient flash messages
//!
//! One message at a time: posting replaces whatever is showing, and a
//! message disappears on its own after five seconds. Callers pass the
//! clock in, so tests can drive time.

use std::time::{Duration, Instant};

/// How long a flash stays on screen.
pub const FLASH_TTL: Duration = Duration::from_secs(5);

/// Message category, mapped to styling by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// One flash message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
    pub level: FlashLevel,
    posted_at: Instant,
}

impl Flash {
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.posted_at) >= ttl
    }
}

/// Single-slot flash holder with auto-expiry
#[derive(Debug, Clone)]
pub struct FlashBoard {
    current: Option<Flash>,
    ttl: Duration,
}

impl FlashBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Show a message, replacing any existing one.
    pub fn post(&mut self, message: impl Into<String>, level: FlashLevel, now: Instant) {
        self.current = Some(Flash {
            message: message.into(),
            level,
            posted_at: now,
        });
    }

    /// The showing message, if it has not expired.
    pub fn current(&self, now: Instant) -> Option<&Flash> {
        self.current
            .as_ref()
            .filter(|flash| !flash.expired(now, self.ttl))
    }

    /// Drop an expired message so it is not re-checked every frame.
    pub fn purge(&mut self, now: Instant) {
        if let Some(flash) = &self.current {
            if flash.expired(now, self.ttl) {
                self.current = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl Default for FlashBoard {
    fn default() -> Self {
        Self::new(FLASH_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_expire() {
        let start = Instant::now();
        let mut board = FlashBoard::new(Duration::from_secs(5));

        assert!(board.current(start).is_none());

        board.post("code sent", FlashLevel::Success, start);
        assert_eq!(
            board.current(start + Duration::from_secs(4)).map(|f| f.level),
            Some(FlashLevel::Success)
        );
        assert!(board.current(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_post_replaces_existing() {
        let start = Instant::now();
        let mut board = FlashBoard::default();

        board.post("first", FlashLevel::Info, start);
        board.post("second", FlashLevel::Danger, start + Duration::from_secs(1));

        let flash = board.current(start + Duration::from_secs(2)).unwrap();
        assert_eq!(flash.message, "second");
        assert_eq!(flash.level, FlashLevel::Danger);
    }

    #[test]
    fn test_purge_drops_expired() {
        let start = Instant::now();
        let mut board = FlashBoard::default();

        board.post("stale", FlashLevel::Warning, start);
        board.purge(start + Duration::from_secs(6));
        assert!(board.current(start + Duration::from_secs(6)).is_none());
    }
}
