// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Errors raised while decoding a vcd file or querying the resulting store.
use num::BigUint;
use thiserror::Error;

use super::reader::Cursor;

fn near(cursor: &Option<Cursor>) -> String {
    match cursor {
        Some(cursor) => format!(" at {cursor}"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum VcdError {
    /// A `$keyword ... $end` block in the header is missing tokens or
    /// holds tokens that cannot be interpreted.
    #[error("malformed `${keyword}` declaration at {cursor}: {reason}")]
    MalformedDeclaration {
        keyword: String,
        reason: String,
        cursor: Cursor,
    },

    /// `$upscope` popped an empty scope stack, or the header ended with
    /// scopes still open.
    #[error("unbalanced scope at {cursor}: {reason}")]
    UnbalancedScope { reason: String, cursor: Cursor },

    #[error("unknown signal `{signal}`{}", near(.cursor))]
    UnknownSignal {
        signal: String,
        cursor: Option<Cursor>,
    },

    #[error(
        "signal `{signal}` is declared with {declared} bit(s) but a \
         value change of {observed} bit(s) targets it at {cursor}"
    )]
    WidthMismatch {
        signal: String,
        declared: u32,
        observed: usize,
        cursor: Cursor,
    },

    /// An externally enforced lookahead bound was exhausted before the
    /// current word or block could be completed.
    #[error("tokenizer overflow at {cursor}: {what} exceeds the limit of {limit}")]
    TokenizerOverflow {
        what: &'static str,
        limit: usize,
        cursor: Cursor,
    },

    #[error("malformed value change `{token}` at {cursor}: {reason}")]
    MalformedValueChange {
        token: String,
        reason: String,
        cursor: Cursor,
    },

    #[error("time marker #{found} at {cursor} precedes current time #{current}")]
    NonMonotonicTime {
        current: BigUint,
        found: BigUint,
        cursor: Cursor,
    },

    #[error("`{signal}` is declared more than once, again at {cursor}")]
    DuplicateSignal { signal: String, cursor: Cursor },

    #[error("word at {cursor} is not valid utf-8")]
    InvalidEncoding { cursor: Cursor },

    #[error("failed to read vcd input: {0}")]
    Io(#[from] std::io::Error),
}

impl VcdError {
    pub(crate) fn malformed_decl(
        keyword: &str,
        reason: impl Into<String>,
        cursor: &Cursor,
    ) -> VcdError {
        VcdError::MalformedDeclaration {
            keyword: keyword.to_string(),
            reason: reason.into(),
            cursor: cursor.clone(),
        }
    }

    pub(crate) fn malformed_change(
        token: &str,
        reason: impl Into<String>,
        cursor: &Cursor,
    ) -> VcdError {
        VcdError::MalformedValueChange {
            token: token.to_string(),
            reason: reason.into(),
            cursor: cursor.clone(),
        }
    }
}
