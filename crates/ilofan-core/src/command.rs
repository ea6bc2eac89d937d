// ── Fan command lines ──
//
// The iLO fan CLI is firmware-specific and unversioned on the wire. Every
// command string the crate sends is built here; changing a format needs a
// compatibility note for the firmware that expects it.

use std::fmt;

/// A fan directive for the controller's command interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCommand {
    /// `fan p global unlock`: hand every fan back to automatic control.
    GlobalUnlock,
    /// `fan p {index} lock {speed}`: pin one fan at a native duty cycle.
    Lock { index: usize, speed: u8 },
}

impl fmt::Display for FanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalUnlock => f.write_str("fan p global unlock"),
            Self::Lock { index, speed } => write!(f, "fan p {index} lock {speed}"),
        }
    }
}
