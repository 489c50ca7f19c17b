// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

const HEX_LUT: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

// A quick bit string parser for at most one nibble. Anything that is not
// a clean `0`/`1` group, be it `x`, `z`, `u` or garbage, has no numeric value.
fn base2_str_to_nibble(word: &[u8]) -> Option<u8> {
    if word.len() > 4 {
        return None;
    }

    let bit_lut = [0b0001u8, 0b0010u8, 0b0100u8, 0b1000u8];

    let mut val = 0u8;
    for (idx, chr) in word.iter().rev().enumerate() {
        match chr {
            b'1' => val |= bit_lut[idx],
            b'0' => {}
            _ => return None,
        }
    }

    Some(val)
}

/// Converts a VCD bit string into exactly `nibble_width` hex digits.
///
/// The bit string is consumed in 4 bit groups starting from the least
/// significant end. Any group holding an unknown bit decodes to `x`. Missing
/// leading groups are zero filled, as VCD drops leading zeros of unsigned
/// values. Groups beyond `nibble_width` are discarded.
///
/// ```
/// use vcd_analysis::decode;
///
/// assert_eq!(decode("101", 2), "05");
/// assert_eq!(decode("1x0111110000", 3), "xf0");
/// ```
pub fn decode(bits: &str, nibble_width: usize) -> String {
    let bits = bits.as_bytes();
    let mut nibbles: Vec<char> = Vec::with_capacity(nibble_width);

    let mut tail_idx = bits.len();
    while tail_idx > 0 && nibbles.len() < nibble_width {
        // clamp head if what remains is shorter than a nibble
        let head_idx = tail_idx.saturating_sub(4);
        let nibble = match base2_str_to_nibble(&bits[head_idx..tail_idx]) {
            Some(val) => HEX_LUT[val as usize],
            None => 'x',
        };
        nibbles.push(nibble);
        tail_idx = head_idx;
    }

    while nibbles.len() < nibble_width {
        nibbles.push('0');
    }

    nibbles.iter().rev().collect()
}
