//! Avatar color and initials for a user's display name.
//!
//! The color is picked from a fixed 16-entry palette by a string hash, so the
//! same name always gets the same color across runs and machines.

use std::fmt;

/// Material palette the listing draws avatars from.
const PALETTE: [[u8; 3]; 16] = [
    [0xf4, 0x43, 0x36],
    [0xe9, 0x1e, 0x63],
    [0x9c, 0x27, 0xb0],
    [0x67, 0x3a, 0xb7],
    [0x3f, 0x51, 0xb5],
    [0x21, 0x96, 0xf3],
    [0x03, 0xa9, 0xf4],
    [0x00, 0xbc, 0xd4],
    [0x00, 0x96, 0x88],
    [0x4c, 0xaf, 0x50],
    [0x8b, 0xc3, 0x4a],
    [0xcd, 0xdc, 0x39],
    [0xff, 0xeb, 0x3b],
    [0xff, 0xc1, 0x07],
    [0xff, 0x98, 0x00],
    [0xff, 0x57, 0x22],
];

/// An RGB color from the avatar palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AvatarColor {
    pub fn to_colored(self) -> colored::Color {
        colored::Color::TrueColor {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

impl fmt::Display for AvatarColor {
    /// Lowercase `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Palette color for `name`.
///
/// Iterates `hash = unit + (int32(hash) << 5) - hash` over the UTF-16 code
/// units. Only the shift wraps to 32 bits; the running value does not.
pub fn avatar_color(name: &str) -> AvatarColor {
    let mut hash: i64 = 0;
    for unit in name.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + shifted - hash;
    }
    let index = (hash.unsigned_abs() % PALETTE.len() as u64) as usize;
    let [r, g, b] = PALETTE[index];
    AvatarColor { r, g, b }
}

/// First letter of each space-separated word, uppercased. `"?"` if there is none.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}
