//! # Stacking-policy flags.
//!
//! [`PresentFlags`] is a small bit set describing how a controller is placed on the
//! stack. Flags come from two places and are OR-ed together at present time:
//! the controller type ([`Presentable::FLAGS`](crate::Presentable::FLAGS)) and the
//! caller ([`PresentArgs::flags`](crate::PresentArgs::flags)).
//!
//! | Flag              | Effect                                                         |
//! |-------------------|----------------------------------------------------------------|
//! | `EXCLUSIVE`       | hides everything below (view concern); blocks command bubbling |
//! | `POPUP`           | shown above the current top without hiding it                  |
//! | `MODAL`           | blocks command bubbling; may be combined with `POPUP`          |
//! | `SINGLETON`       | at most one live instance per controller type                  |
//! | `CHILD`           | dismissed together with the presenting controller              |
//! | `DISMISS_CURRENT` | dismisses the current top before pushing                       |
//! | `DISMISS_ALL`     | dismisses the whole stack before pushing                       |
//! | `DO_NOT_ACTIVATE` | skips activation right after the push                          |

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bit set of stacking-policy flags.
///
/// # Example
/// ```
/// use viewvisor::PresentFlags;
///
/// let flags = PresentFlags::MODAL | PresentFlags::POPUP;
/// assert!(flags.contains(PresentFlags::MODAL));
/// assert!(flags.blocks_commands());
/// assert_eq!(format!("{flags:?}"), "POPUP | MODAL");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PresentFlags(u16);

impl PresentFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Exclusive: everything below is hidden; commands do not bubble past it.
    pub const EXCLUSIVE: Self = Self(1 << 0);
    /// Popup: drawn over the current top.
    pub const POPUP: Self = Self(1 << 1);
    /// Modal: commands do not bubble past it.
    pub const MODAL: Self = Self(1 << 2);
    /// Singleton: an existing instance of the same type is dismissed first.
    pub const SINGLETON: Self = Self(1 << 3);
    /// Child: dismissed in cascade with its presenting controller.
    pub const CHILD: Self = Self(1 << 4);
    /// Dismiss the current top before pushing.
    pub const DISMISS_CURRENT: Self = Self(1 << 5);
    /// Dismiss every controller before pushing.
    pub const DISMISS_ALL: Self = Self(1 << 6);
    /// Do not activate right after the push.
    pub const DO_NOT_ACTIVATE: Self = Self(1 << 7);

    /// Modal popup shorthand.
    pub const MODAL_POPUP: Self = Self(Self::MODAL.0 | Self::POPUP.0);

    const NAMES: [(Self, &'static str); 8] = [
        (Self::EXCLUSIVE, "EXCLUSIVE"),
        (Self::POPUP, "POPUP"),
        (Self::MODAL, "MODAL"),
        (Self::SINGLETON, "SINGLETON"),
        (Self::CHILD, "CHILD"),
        (Self::DISMISS_CURRENT, "DISMISS_CURRENT"),
        (Self::DISMISS_ALL, "DISMISS_ALL"),
        (Self::DO_NOT_ACTIVATE, "DO_NOT_ACTIVATE"),
    ];

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Builds a set from raw bits, dropping unknown ones.
    #[inline]
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0xff)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every flag of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag of `other` is set.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Modal or exclusive: unhandled commands stop here.
    #[inline]
    pub const fn blocks_commands(self) -> bool {
        self.intersects(Self(Self::MODAL.0 | Self::EXCLUSIVE.0))
    }
}

impl BitOr for PresentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for PresentFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PresentFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for PresentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
