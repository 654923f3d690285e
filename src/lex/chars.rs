//! Character classification for the scanner.
//!
//! A pre-computed table maps each 7-bit byte to a bitmask of lexical
//! classes so the scanner can test membership with one lookup instead of
//! branch chains. Bytes outside the ASCII range classify as nothing.

const ALPHA: u8 = 0b0000_0001;
const DIGIT: u8 = 0b0000_0010;
const NAME_START: u8 = 0b0000_0100;
pub(crate) const NAME: u8 = 0b0000_1000;
const SPACE: u8 = 0b0001_0000;
pub(crate) const END_OF_LINE: u8 = 0b0010_0000;
pub(crate) const STAR_OR_NL: u8 = 0b0100_0000;

/// Class table for the 7-bit range.
///
/// NUL counts as end-of-line so line-oriented scans stop at the buffer
/// sentinel without a separate length check. `*` shares a class with the
/// line enders because comment-body scanning hops between stars and
/// newlines.
const CLASS_TABLE: [u8; 128] = {
    let mut table = [0u8; 128];
    let mut i = 0;

    while i < 128 {
        let c = i as u8;
        let mut flags = 0u8;

        if matches!(c, b'a'..=b'z' | b'A'..=b'Z') {
            flags |= ALPHA | NAME_START | NAME;
        }
        if matches!(c, b'_' | b'$') {
            flags |= NAME_START | NAME;
        }
        if matches!(c, b'0'..=b'9') {
            flags |= DIGIT | NAME;
        }
        // Space class covers backspace and CR as well; NL and CR are
        // also line enders.
        if matches!(c, b' ' | b'\t' | 0x08 | 0x0B | 0x0C | b'\n' | b'\r') {
            flags |= SPACE;
        }
        if matches!(c, b'\n' | b'\r' | 0x00) {
            flags |= END_OF_LINE | STAR_OR_NL;
        }
        if c == b'*' {
            flags |= STAR_OR_NL;
        }

        table[i] = flags;
        i += 1;
    }

    table
};

#[inline]
pub(crate) const fn classify(c: u8) -> u8 {
    if c < 0x80 { CLASS_TABLE[c as usize] } else { 0 }
}

#[inline]
pub(crate) const fn is_space(c: u8) -> bool {
    classify(c) & SPACE != 0
}

#[inline]
pub(crate) const fn is_end_of_line(c: u8) -> bool {
    classify(c) & END_OF_LINE != 0
}

#[inline]
pub(crate) const fn is_name_start(c: u8) -> bool {
    classify(c) & NAME_START != 0
}

#[inline]
pub(crate) const fn is_name(c: u8) -> bool {
    classify(c) & NAME != 0
}

/// First index at or after `pos` whose byte is NOT in `class` (or the
/// buffer end).
pub(crate) fn skip_while(text: &[u8], mut pos: usize, class: u8) -> usize {
    while pos < text.len() && classify(text[pos]) & class != 0 {
        pos += 1;
    }
    pos
}

/// First index at or after `pos` whose byte IS in `class` (or the
/// buffer end).
pub(crate) fn skip_until(text: &[u8], mut pos: usize, class: u8) -> usize {
    while pos < text.len() && classify(text[pos]) & class == 0 {
        pos += 1;
    }
    pos
}
