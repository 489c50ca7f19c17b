// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::{Read, Seek, SeekFrom};

use super::error::VcdError;
use super::reader::{TokenSource, WordReader, DEFAULT_CHUNK_SIZE};
use super::store::WaveformStore;

mod blocks;
use blocks::*;

mod combinator_atoms;

mod types;

mod metadata;
use metadata::*;

mod scopes;
use scopes::*;

mod events;
use events::*;

/// Knobs for the tokenizer. The defaults never give up on a long word or
/// block, they just keep reading.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Bytes fetched from the input per refill.
    pub chunk_size: usize,
    /// Longest word accepted before failing with `TokenizerOverflow`.
    pub max_word_len: Option<usize>,
    /// Most words accepted between a `$keyword` and its `$end` before
    /// failing with `TokenizerOverflow`.
    pub max_block_tokens: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_word_len: None,
            max_block_tokens: None,
        }
    }
}

fn scanner<R: Read>(reader: R, options: &ParseOptions) -> BlockScanner<WordReader<R>> {
    let words =
        WordReader::with_chunk_size(reader, options.chunk_size).max_word_len(options.max_word_len);
    BlockScanner::new(words, options.max_block_tokens)
}

/// Builds the signal table and metadata from the declarations.
fn parse_header<T: TokenSource>(
    scanner: &mut BlockScanner<T>,
    store: &mut WaveformStore,
) -> Result<(), VcdError> {
    let mut scopes = ScopeStack::default();

    while let Some(item) = scanner.next_item()? {
        // the first loose word starts the value change section, even
        // without a `$enddefinitions`
        let Item::Block(block) = item else {
            break;
        };
        log::debug!("${} block at {}", block.keyword.name(), block.cursor);

        match block.keyword {
            Keyword::Timescale => store.metadata.timescale = Some(parse_timescale(&block)?),
            Keyword::Date => {
                store.metadata.date = parse_date(&block);
                if store.metadata.date.is_none() {
                    log::warn!("could not make sense of the `$date` at {}", block.cursor);
                }
            }
            Keyword::Version => store.metadata.version = Some(parse_version(&block)),
            Keyword::Comment => store.metadata.comments.push(parse_comment(&block)),
            Keyword::Scope => parse_scope(&block, &mut scopes)?,
            Keyword::Upscope => parse_upscope(&block, &mut scopes)?,
            Keyword::Var => parse_var(&block, &scopes, store)?,
            Keyword::EndDefinitions => break,
            Keyword::Other(_) => {}
        }
    }

    scopes.ensure_closed()
}

/// Decodes a vcd file in two passes: the declarations first, then, from
/// the start of the input again, every value change.
pub fn parse_vcd_with_options<R: Read + Seek>(
    mut reader: R,
    options: &ParseOptions,
) -> Result<WaveformStore, VcdError> {
    let mut store = WaveformStore::default();

    parse_header(&mut scanner(&mut reader, options), &mut store)?;
    log::info!("declarations hold {} signal(s)", store.num_signals());

    reader.seek(SeekFrom::Start(0))?;
    let num_changes = parse_events(&mut scanner(&mut reader, options), &mut store)?;
    log::info!("recorded {num_changes} value change(s)");

    Ok(store)
}

pub fn parse_vcd<R: Read + Seek>(reader: R) -> Result<WaveformStore, VcdError> {
    parse_vcd_with_options(reader, &ParseOptions::default())
}

/// [`parse_vcd`] over an input that has already been read into memory.
pub fn parse_vcd_bytes(bytes: &[u8]) -> Result<WaveformStore, VcdError> {
    parse_vcd(std::io::Cursor::new(bytes))
}
