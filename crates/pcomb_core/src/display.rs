//! Character rendering for failure messages.

use std::fmt;

const CONTROL_NAMES: [&str; 32] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US",
];

/// Renders an optional character the way failure messages expect it.
///
/// - `None` (end of input) renders as `EOF`
/// - code points 0 to 31 render as their ASCII mnemonic (`LF`, `CR`, ...)
/// - everything else renders as `'c'(code)`, e.g. `'a'(97)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDisplay(pub Option<char>);

impl CharDisplay {
    /// The mnemonic for a C0 control character, if `ch` is one.
    pub fn control_name(ch: char) -> Option<&'static str> {
        CONTROL_NAMES.get(ch as usize).copied()
    }
}

impl From<char> for CharDisplay {
    fn from(ch: char) -> Self {
        CharDisplay(Some(ch))
    }
}

impl fmt::Display for CharDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("EOF"),
            Some(ch) => match Self::control_name(ch) {
                Some(name) => f.write_str(name),
                None => write!(f, "'{ch}'({})", u32::from(ch)),
            },
        }
    }
}
