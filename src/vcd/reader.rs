// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;
use std::io::{self, Read};
use std::str;

use super::error::VcdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line(pub(crate) usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word(pub(crate) usize);

/// Location of a word in the input, 1-based line and 1-based position of
/// the word within that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(pub(crate) Line, pub(crate) Word);

impl Cursor {
    pub fn line(&self) -> usize {
        let Cursor(Line(line), _) = self;
        *line
    }

    pub fn word(&self) -> usize {
        let Cursor(_, Word(word)) = self;
        *word
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, word {}", self.line(), self.word())
    }
}

/// Pull-based source of whitespace delimited words.
pub(crate) trait TokenSource {
    fn next_word(&mut self) -> Result<Option<(&str, Cursor)>, VcdError>;
}

pub(crate) const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Splits any byte stream into words while reading it in fixed size chunks.
///
/// A word is only handed out once whitespace (or the end of the input) has
/// been seen after it. When the window ends in the middle of a word, the
/// unconsumed tail is kept and the window is refilled before the word is
/// finalized, so no word is ever split across a chunk boundary.
pub(crate) struct WordReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    // index of the first byte not yet handed out
    head: usize,
    chunk_size: usize,
    max_word_len: Option<usize>,
    eof: bool,
    curr_line: usize,
    curr_word: usize,
}

impl<R: Read> WordReader<R> {
    pub(crate) fn with_chunk_size(reader: R, chunk_size: usize) -> WordReader<R> {
        WordReader {
            reader,
            buffer: Vec::new(),
            head: 0,
            chunk_size: chunk_size.max(1),
            max_word_len: None,
            eof: false,
            curr_line: 1,
            curr_word: 0,
        }
    }

    pub(crate) fn max_word_len(mut self, limit: Option<usize>) -> WordReader<R> {
        self.max_word_len = limit;
        self
    }

    fn cursor(&self) -> Cursor {
        Cursor(Line(self.curr_line), Word(self.curr_word + 1))
    }

    // Drop everything before `head`, then append one more chunk. Offsets
    // relative to `head` stay valid across a refill.
    fn refill(&mut self) -> Result<(), VcdError> {
        self.buffer.drain(..self.head);
        self.head = 0;

        let filled = self.buffer.len();
        self.buffer.resize(filled + self.chunk_size, 0);
        let bytes_read = loop {
            match self.reader.read(&mut self.buffer[filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(filled);
                    return Err(e.into());
                }
            }
        };
        self.buffer.truncate(filled + bytes_read);

        if bytes_read == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

impl<R: Read> TokenSource for WordReader<R> {
    fn next_word(&mut self) -> Result<Option<(&str, Cursor)>, VcdError> {
        // skip whitespace, refilling as often as needed
        loop {
            while self.head < self.buffer.len() && self.buffer[self.head].is_ascii_whitespace() {
                if self.buffer[self.head] == b'\n' {
                    self.curr_line += 1;
                    self.curr_word = 0;
                }
                self.head += 1;
            }
            if self.head < self.buffer.len() {
                break;
            }
            if self.eof {
                return Ok(None);
            }
            self.refill()?;
        }

        // the word starts at `head`. Grow it until whitespace is found
        let mut len = 0usize;
        loop {
            while self.head + len < self.buffer.len()
                && !self.buffer[self.head + len].is_ascii_whitespace()
            {
                len += 1;
            }

            if let Some(limit) = self.max_word_len {
                if len > limit {
                    return Err(VcdError::TokenizerOverflow {
                        what: "word length",
                        limit,
                        cursor: self.cursor(),
                    });
                }
            }

            if self.head + len < self.buffer.len() || self.eof {
                break;
            }
            // window ends mid-word
            self.refill()?;
        }

        let cursor = self.cursor();
        self.curr_word += 1;
        let start = self.head;
        self.head += len;

        let word = str::from_utf8(&self.buffer[start..start + len])
            .map_err(|_| VcdError::InvalidEncoding {
                cursor: cursor.clone(),
            })?;
        Ok(Some((word, cursor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect<R: Read>(mut reader: WordReader<R>) -> Vec<(String, usize, usize)> {
        let mut words = vec![];
        while let Some((word, cursor)) = reader.next_word().unwrap() {
            words.push((word.to_string(), cursor.line(), cursor.word()));
        }
        words
    }

    const SAMPLE: &str = "$var wire 1 ! clk $end\n#0\n\n  b1010 \"\n";

    #[test]
    fn words_carry_line_and_position() {
        let words = collect(WordReader::with_chunk_size(SAMPLE.as_bytes(), DEFAULT_CHUNK_SIZE));
        assert_eq!(
            words,
            vec![
                ("$var".to_string(), 1, 1),
                ("wire".to_string(), 1, 2),
                ("1".to_string(), 1, 3),
                ("!".to_string(), 1, 4),
                ("clk".to_string(), 1, 5),
                ("$end".to_string(), 1, 6),
                ("#0".to_string(), 2, 1),
                ("b1010".to_string(), 4, 1),
                ("\"".to_string(), 4, 2),
            ]
        );
    }

    #[test]
    fn chunk_boundaries_never_split_words() {
        let expected = collect(WordReader::with_chunk_size(SAMPLE.as_bytes(), DEFAULT_CHUNK_SIZE));
        for chunk_size in 1..=SAMPLE.len() {
            let words = collect(WordReader::with_chunk_size(SAMPLE.as_bytes(), chunk_size));
            assert_eq!(words, expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn last_word_without_trailing_newline() {
        let words = collect(WordReader::with_chunk_size("#10 1!".as_bytes(), 4));
        assert_eq!(
            words,
            vec![("#10".to_string(), 1, 1), ("1!".to_string(), 1, 2)]
        );
    }

    #[test]
    fn empty_input_has_no_words() {
        let mut reader = WordReader::with_chunk_size(" \n\t ".as_bytes(), DEFAULT_CHUNK_SIZE);
        assert!(reader.next_word().unwrap().is_none());
        // staying at eof is fine
        assert!(reader.next_word().unwrap().is_none());
    }

    #[test]
    fn bounded_word_length_overflows() {
        let mut reader =
            WordReader::with_chunk_size("b0101010101 !".as_bytes(), 2).max_word_len(Some(4));
        match reader.next_word() {
            Err(VcdError::TokenizerOverflow { limit, cursor, .. }) => {
                assert_eq!(limit, 4);
                assert_eq!((cursor.line(), cursor.word()), (1, 1));
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn bounded_word_length_accepts_words_at_the_limit() {
        let words =
            collect(WordReader::with_chunk_size("b010 !".as_bytes(), 1).max_word_len(Some(4)));
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let bytes: &[u8] = &[b'#', b'1', b' ', 0xff, 0xfe, b'\n'];
        let mut reader = WordReader::with_chunk_size(bytes, DEFAULT_CHUNK_SIZE);
        assert!(reader.next_word().unwrap().is_some());
        assert!(matches!(
            reader.next_word(),
            Err(VcdError::InvalidEncoding { .. })
        ));
    }
}
