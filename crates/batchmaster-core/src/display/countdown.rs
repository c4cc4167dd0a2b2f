//! Countdown formatting.

use std::fmt;

/// Whole seconds shown as `mm:ss`, or `h:mm:ss` from one hour up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown(pub u64);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{minutes:02}:{seconds:02}")
        }
    }
}
