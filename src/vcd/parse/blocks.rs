// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Groups the word stream into `$keyword ... $end` blocks and loose words.
use std::mem;

use super::super::error::VcdError;
use super::super::reader::{Cursor, TokenSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Keyword {
    Timescale,
    Date,
    Comment,
    Version,
    Scope,
    Upscope,
    Var,
    EndDefinitions,
    // any other `$keyword ... $end` block, e.g. `$attrbegin`
    Other(String),
}

impl Keyword {
    /// `None` for words that don't open a block. `$end` and the dump
    /// keywords fall in that category: the value changes that follow
    /// `$dumpvars` are ordinary records.
    fn from_word(word: &str) -> Option<Keyword> {
        let keyword = word.strip_prefix('$')?;
        let keyword = match keyword {
            "timescale" => Keyword::Timescale,
            "date" => Keyword::Date,
            "comment" => Keyword::Comment,
            "version" => Keyword::Version,
            "scope" => Keyword::Scope,
            "upscope" => Keyword::Upscope,
            "var" => Keyword::Var,
            "enddefinitions" => Keyword::EndDefinitions,
            "end" | "dumpvars" | "dumpall" | "dumpon" | "dumpoff" => return None,
            other => Keyword::Other(other.to_string()),
        };
        Some(keyword)
    }

    pub(super) fn name(&self) -> &str {
        match self {
            Keyword::Timescale => "timescale",
            Keyword::Date => "date",
            Keyword::Comment => "comment",
            Keyword::Version => "version",
            Keyword::Scope => "scope",
            Keyword::Upscope => "upscope",
            Keyword::Var => "var",
            Keyword::EndDefinitions => "enddefinitions",
            Keyword::Other(name) => name,
        }
    }
}

#[derive(Debug)]
pub(super) struct Block {
    pub(super) keyword: Keyword,
    pub(super) cursor: Cursor,
    // every word between the keyword and its `$end`
    pub(super) body: Vec<(String, Cursor)>,
}

#[derive(Debug)]
pub(super) enum Item {
    Block(Block),
    Word(String, Cursor),
}

#[derive(Debug)]
enum ScanState {
    AwaitingStart,
    AwaitingTerminator(Block),
}

pub(super) struct BlockScanner<T: TokenSource> {
    source: T,
    state: ScanState,
    max_block_tokens: Option<usize>,
}

impl<T: TokenSource> BlockScanner<T> {
    pub(super) fn new(source: T, max_block_tokens: Option<usize>) -> BlockScanner<T> {
        BlockScanner {
            source,
            state: ScanState::AwaitingStart,
            max_block_tokens,
        }
    }

    /// The next word, taken as is even if it looks like a keyword.
    ///
    /// Identifiers are drawn from all printable characters, so the
    /// identifier word of `b1010 $` must not open a block.
    pub(super) fn next_loose_word(&mut self) -> Result<Option<(String, Cursor)>, VcdError> {
        debug_assert!(matches!(self.state, ScanState::AwaitingStart));
        Ok(self
            .source
            .next_word()?
            .map(|(word, cursor)| (word.to_string(), cursor)))
    }

    /// Pulls words until a complete block or a loose word is available.
    ///
    /// An open block keeps pulling words for as long as the source has
    /// them. Only an explicit `max_block_tokens` cuts it short.
    pub(super) fn next_item(&mut self) -> Result<Option<Item>, VcdError> {
        loop {
            let next = self.source.next_word()?;
            let state = mem::replace(&mut self.state, ScanState::AwaitingStart);

            match (state, next) {
                (ScanState::AwaitingStart, None) => return Ok(None),
                (ScanState::AwaitingTerminator(block), None) => {
                    return Err(VcdError::malformed_decl(
                        block.keyword.name(),
                        "reached end of file before `$end`",
                        &block.cursor,
                    ))
                }
                (ScanState::AwaitingStart, Some((word, cursor))) => match Keyword::from_word(word) {
                    Some(keyword) => {
                        self.state = ScanState::AwaitingTerminator(Block {
                            keyword,
                            cursor,
                            body: vec![],
                        })
                    }
                    None => return Ok(Some(Item::Word(word.to_string(), cursor))),
                },
                (ScanState::AwaitingTerminator(block), Some((word, _))) if word == "$end" => {
                    return Ok(Some(Item::Block(block)))
                }
                (ScanState::AwaitingTerminator(mut block), Some((word, cursor))) => {
                    if let Some(limit) = self.max_block_tokens {
                        if block.body.len() >= limit {
                            return Err(VcdError::TokenizerOverflow {
                                what: "block token count",
                                limit,
                                cursor,
                            });
                        }
                    }
                    block.body.push((word.to_string(), cursor));
                    self.state = ScanState::AwaitingTerminator(block);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::reader::WordReader;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
$date
    Thu Oct 16 13:46:00 2026
$end
$scope module top $end
$var wire 1 ! clk $end
$upscope $end
$enddefinitions $end
$dumpvars
0!
$end
#5
1!
";

    // flatten items into something easy to compare
    fn summarize(input: &str, chunk_size: usize) -> Vec<String> {
        let reader = WordReader::with_chunk_size(input.as_bytes(), chunk_size);
        let mut scanner = BlockScanner::new(reader, None);
        let mut items = vec![];
        while let Some(item) = scanner.next_item().unwrap() {
            items.push(match item {
                Item::Block(block) => {
                    let body: Vec<&str> = block.body.iter().map(|(w, _)| w.as_str()).collect();
                    format!("${}[{}]", block.keyword.name(), body.join(" "))
                }
                Item::Word(word, _) => word,
            });
        }
        items
    }

    #[test]
    fn groups_blocks_and_loose_words() {
        assert_eq!(
            summarize(SAMPLE, 4096),
            vec![
                "$date[Thu Oct 16 13:46:00 2026]",
                "$scope[module top]",
                "$var[wire 1 ! clk]",
                "$upscope[]",
                "$enddefinitions[]",
                "$dumpvars",
                "0!",
                "$end",
                "#5",
                "1!",
            ]
        );
    }

    #[test]
    fn identical_items_for_every_chunk_size() {
        let expected = summarize(SAMPLE, 4096);
        for chunk_size in 1..32 {
            assert_eq!(summarize(SAMPLE, chunk_size), expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn unknown_keywords_are_still_blocks() {
        assert_eq!(
            summarize("$attrbegin misc 07 foo 1 $end #0", 8),
            vec!["$attrbegin[misc 07 foo 1]", "#0"]
        );
    }

    #[test]
    fn missing_terminator_is_malformed() {
        let reader = WordReader::with_chunk_size("$comment never closed".as_bytes(), 16);
        let mut scanner = BlockScanner::new(reader, None);
        match scanner.next_item() {
            Err(VcdError::MalformedDeclaration { keyword, cursor, .. }) => {
                assert_eq!(keyword, "comment");
                assert_eq!((cursor.line(), cursor.word()), (1, 1));
            }
            other => panic!("expected a malformed declaration, got {other:?}"),
        }
    }

    #[test]
    fn bounded_lookahead_overflows() {
        let reader = WordReader::with_chunk_size("$comment a b c d e $end".as_bytes(), 3);
        let mut scanner = BlockScanner::new(reader, Some(3));
        assert!(matches!(
            scanner.next_item(),
            Err(VcdError::TokenizerOverflow { limit: 3, .. })
        ));

        // a block that fits within the bound is fine
        let reader = WordReader::with_chunk_size("$comment a b c $end".as_bytes(), 3);
        let mut scanner = BlockScanner::new(reader, Some(3));
        assert!(matches!(scanner.next_item(), Ok(Some(Item::Block(_)))));
    }
}
