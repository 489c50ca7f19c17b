// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use chrono::prelude::*;
use itertools::Itertools;

use super::super::error::VcdError;
use super::super::types::{TimeUnit, Timescale, Version};
use super::blocks::Block;
use super::combinator_atoms::{digit, take_while};
use super::types::ParseResult;

const DATE_FORMATS: [&str; 3] = ["%a %b %e %T %Y", "%Y-%m-%d %H:%M:%S", "%b %d, %Y %T"];

fn words(block: &Block) -> Vec<&str> {
    block.body.iter().map(|(word, _)| word.as_str()).collect()
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// Best effort, `None` if no known date layout matches.
pub(super) fn parse_date(block: &Block) -> Option<DateTime<Utc>> {
    let words = words(block);

    if let Some(date) = parse_date_text(&words.join(" ")) {
        return Some(date);
    }

    // a date is typically composed of the 5 following words which can
    // occur in any order:
    // {Day, Month, Date(number in month), hh:mm:ss, year}.
    // Thus we try our date parser on all 5! = 120 orderings.
    if words.len() != 5 {
        return None;
    }
    words
        .iter()
        .permutations(words.len())
        .find_map(|permutation| parse_date_text(&permutation.into_iter().join(" ")))
}

pub(super) fn parse_version(block: &Block) -> Version {
    Version(words(block).join(" "))
}

pub(super) fn parse_comment(block: &Block) -> String {
    words(block).join(" ")
}

pub(super) fn parse_timescale(block: &Block) -> Result<Timescale, VcdError> {
    let malformed = |reason: String| VcdError::malformed_decl("timescale", reason, &block.cursor);

    // we might see `1ps $end` or `1 ps $end`
    let words = words(block);
    let (magnitude, unit) = match words.as_slice() {
        [word] => {
            let ParseResult { matched, residual } = take_while(word, digit);
            (matched, residual)
        }
        [magnitude, unit] => (*magnitude, *unit),
        _ => {
            return Err(malformed(format!(
                "expected a magnitude and a unit, found `{}`",
                words.join(" ")
            )))
        }
    };

    let magnitude = magnitude
        .parse::<u32>()
        .map_err(|e| malformed(format!("bad magnitude `{magnitude}`: {e}")))?;
    let unit = TimeUnit::from_word(unit).ok_or_else(|| {
        malformed(format!(
            "unknown unit `{unit}`, expected one of fs, ps, ns, us, ms, s"
        ))
    })?;

    Ok(Timescale { magnitude, unit })
}
