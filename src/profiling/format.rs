//! Allocation-free number and column formatting.
//!
//! `push_radix` renders an unsigned integer (up to 64 bits) in any radix
//! from 2 to 36 into a
//! heapless string without going through `core::fmt`. The statistics report
//! uses it for decimal fields; other radixes are handy for dumping registers
//! and masks over the same serial link.

use heapless::String;

/// Smallest supported radix.
pub const MIN_RADIX: u32 = 2;

/// Largest supported radix (digits 0-9 then a-z).
pub const MAX_RADIX: u32 = 36;

/// Enough room for `u64::MAX` in base 2.
pub const MAX_DIGITS: usize = 64;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Push `val` in base `radix` onto `s`.
///
/// Returns `false` (leaving `s` untouched) if the radix is outside 2..=36 or
/// the digits do not fit in the remaining capacity.
pub fn push_radix<const N: usize>(
    s: &mut String<N>,
    mut val: u64,
    radix: u32,
) -> bool {
    if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
        return false;
    }
    let radix = u64::from(radix);

    // Build digits in reverse
    let mut digits = [0u8; MAX_DIGITS];
    let mut i = 0;
    loop {
        digits[i] = DIGITS[(val % radix) as usize];
        val /= radix;
        i += 1;
        if val == 0 {
            break;
        }
    }

    if N - s.len() < i {
        return false;
    }

    // Push in correct order
    while i > 0 {
        i -= 1;
        s.push(digits[i] as char).ok();
    }
    true
}

/// Render `val` in base `radix`, or `None` for an unsupported radix.
pub fn format_radix(
    val: u64,
    radix: u32,
) -> Option<String<MAX_DIGITS>> {
    let mut s = String::new();
    push_radix(&mut s, val, radix).then_some(s)
}

/// Horizontal alignment inside a fixed-width field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Push `text` padded with spaces to `width` characters.
///
/// Text longer than `width` is truncated, so only use it for labels; see
/// [`push_right`] for numbers. Stops silently at capacity.
pub fn push_padded<const N: usize>(
    s: &mut String<N>,
    text: &str,
    width: usize,
    align: Align,
) {
    let len = text.chars().count().min(width);
    let pad = width - len;

    if align == Align::Right {
        for _ in 0..pad {
            s.push(' ').ok();
        }
    }
    for c in text.chars().take(len) {
        s.push(c).ok();
    }
    if align == Align::Left {
        for _ in 0..pad {
            s.push(' ').ok();
        }
    }
}

/// Push `text` right-aligned in `width` characters, never truncated.
///
/// Text that does not fit gets a single leading space instead, so it widens
/// its column but stays apart from the previous one.
pub fn push_right<const N: usize>(
    s: &mut String<N>,
    text: &str,
    width: usize,
) {
    let len = text.chars().count();
    push_padded(s, text, width.max(len + 1), Align::Right);
}

// =============================================================================
// Tests
// =============================================================================
