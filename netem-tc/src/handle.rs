//! TC handles and the numbering scheme of our hierarchies.
//!
//! TC handles are split into major:minor (16:16 bits). Both halves are written in hexadecimal by
//! `tc`. A qdisc is addressed by its major alone (`30:`), a class by both (`30:1`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub major: u16,
    pub minor: u16,
}

impl Handle {
    /// A qdisc handle, `major:`.
    pub const fn qdisc(major: u16) -> Self {
        Self { major, minor: 0 }
    }

    /// A class handle, `major:minor`.
    pub const fn class(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            write!(f, "{:x}:", self.major)
        } else {
            write!(f, "{:x}:{:x}", self.major, self.minor)
        }
    }
}

// Token bucket only: `root 1: netem` -> `1:1 10: tbf`.

/// Root netem qdisc when it sits above a token bucket.
pub const NETEM_ROOT: Handle = Handle::qdisc(0x1);
/// The netem class the token bucket attaches to.
pub const NETEM_ROOT_CLASS: Handle = Handle::class(0x1, 0x1);
/// Token bucket below the root netem.
pub const TBF: Handle = Handle::qdisc(0x10);

// Destination filtered: `root 1: prio` -> `1:3 30: tbf` -> `30:1 31: netem`.

/// Root priority qdisc.
pub const PRIO_ROOT: Handle = Handle::qdisc(0x1);
/// The priority band filtered traffic is sent to. Bands 1 and 2 keep serving the rest.
pub const PRIO_FILTERED_BAND: Handle = Handle::class(0x1, 0x3);
/// Token bucket for filtered traffic.
pub const FILTERED_TBF: Handle = Handle::qdisc(0x30);
/// The token bucket class netem attaches to.
pub const FILTERED_TBF_CLASS: Handle = Handle::class(0x30, 0x1);
/// Netem below the filtered token bucket.
pub const FILTERED_NETEM: Handle = Handle::qdisc(0x31);
/// Preference of the destination filter.
pub const FILTER_PRIORITY: u16 = 3;
