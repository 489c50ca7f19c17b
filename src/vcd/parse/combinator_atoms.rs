// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use super::types::ParseResult;

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word.bytes().take_while(|chr| cond(*chr)).count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_leading_digits() {
        assert_eq!(
            take_while("100ps", digit),
            ParseResult {
                matched: "100",
                residual: "ps"
            }
        );
        assert_eq!(
            take_while("ns", digit),
            ParseResult {
                matched: "",
                residual: "ns"
            }
        );
        assert_eq!(
            take_while("10", digit),
            ParseResult {
                matched: "10",
                residual: ""
            }
        );
    }
}
