use serde::{Deserialize, Serialize};

/// Whether a block/escalation counter was raised by an explicit signal
/// (a login failure against a known account) or an implicit one (traffic
/// shape alone, with no confirmation the account exists). The store
/// keeps this as the sign of the counter value — negative for implicit,
/// positive for explicit — but callers work with this enum instead of a
/// raw signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Explicit,
    Implicit,
}

impl Visibility {
    pub fn is_explicit(self) -> bool {
        matches!(self, Visibility::Explicit)
    }
}

/// The escalation/block counter for one key (`Ab:<ip>`, `Bb:<user>`,
/// `Wb:<ip>:<user>`, or their Z-family equivalents), decoded from the
/// signed integer the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockState {
    pub visibility: Visibility,
    pub magnitude: u32,
}

impl BlockState {
    pub fn new(visibility: Visibility, magnitude: u32) -> Self {
        Self { visibility, magnitude }
    }

    /// Decode a value read back from the store. `0` (or absent, which
    /// callers map to `0` before calling this) means no block is active.
    pub fn from_stored(raw: i64) -> Option<Self> {
        if raw == 0 {
            return None;
        }
        let visibility = if raw < 0 {
            Visibility::Implicit
        } else {
            Visibility::Explicit
        };
        Some(Self {
            visibility,
            magnitude: raw.unsigned_abs() as u32,
        })
    }

    /// Encode for storage: explicit stays positive, implicit goes negative.
    pub fn to_stored(self) -> i64 {
        let mag = self.magnitude as i64;
        match self.visibility {
            Visibility::Explicit => mag,
            Visibility::Implicit => -mag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_explicit() {
        let b = BlockState::new(Visibility::Explicit, 3);
        assert_eq!(b.to_stored(), 3);
        assert_eq!(BlockState::from_stored(3), Some(b));
    }

    #[test]
    fn round_trips_implicit() {
        let b = BlockState::new(Visibility::Implicit, 2);
        assert_eq!(b.to_stored(), -2);
        assert_eq!(BlockState::from_stored(-2), Some(b));
    }

    #[test]
    fn zero_is_no_block() {
        assert_eq!(BlockState::from_stored(0), None);
    }
}
