// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that handles the signal tree: scopes and the
//! variables declared within them
use std::iter;

use itertools::Itertools;

use super::super::error::VcdError;
use super::super::reader::Cursor;
use super::super::signal::{Signal, SignalMeta, SignalType};
use super::super::store::WaveformStore;
use super::blocks::Block;

/// Names of the currently open scopes, outermost first.
#[derive(Debug, Default)]
pub(super) struct ScopeStack {
    // nameless scopes push an empty frame so that their `$upscope`
    // still has something to pop
    frames: Vec<(String, Cursor)>,
}

impl ScopeStack {
    pub(super) fn push(&mut self, name: &str, cursor: &Cursor) {
        self.frames.push((name.to_string(), cursor.clone()));
    }

    pub(super) fn pop(&mut self, cursor: &Cursor) -> Result<(), VcdError> {
        match self.frames.pop() {
            Some(_) => Ok(()),
            None => Err(VcdError::UnbalancedScope {
                reason: "`$upscope` without a matching `$scope`".to_string(),
                cursor: cursor.clone(),
            }),
        }
    }

    pub(super) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Fails if any scope is still open, pointing at the innermost one.
    pub(super) fn ensure_closed(&self) -> Result<(), VcdError> {
        match self.frames.last() {
            None => Ok(()),
            Some((_, cursor)) => Err(VcdError::UnbalancedScope {
                reason: format!(
                    "{} scope(s) still open at the end of the declarations",
                    self.depth()
                ),
                cursor: cursor.clone(),
            }),
        }
    }

    /// `top.cpu.` + `pc`. Nameless scopes are transparent.
    pub(super) fn qualify(&self, local_name: &str) -> String {
        self.frames
            .iter()
            .map(|(frame, _)| frame.as_str())
            .filter(|frame| !frame.is_empty())
            .chain(iter::once(local_name))
            .join(".")
    }
}

pub(super) fn parse_scope(block: &Block, scopes: &mut ScopeStack) -> Result<(), VcdError> {
    // $scope module reg_mag_i $end
    //        ^^^^^^ ^^^^^^^^^ - scope type and scope name
    match block.body.as_slice() {
        [(scope_type, _), (scope_name, _)] => {
            log::debug!("entering {scope_type} `{scope_name}`");
            scopes.push(scope_name, &block.cursor);
            Ok(())
        }
        // Some VCD files in the wild carry scopes without names. We
        // tolerate them by making the nameless scope transparent, i.e.
        // `$scope module a $end $scope module $end $scope module b $end`
        // creates `a.b`.
        [(scope_type, _)] => {
            log::debug!("entering nameless {scope_type}");
            scopes.push("", &block.cursor);
            Ok(())
        }
        _ => Err(VcdError::malformed_decl(
            "scope",
            format!(
                "expected a scope type and a name, found {} word(s)",
                block.body.len()
            ),
            &block.cursor,
        )),
    }
}

pub(super) fn parse_upscope(block: &Block, scopes: &mut ScopeStack) -> Result<(), VcdError> {
    if let Some((word, cursor)) = block.body.first() {
        return Err(VcdError::malformed_decl(
            "upscope",
            format!("unexpected `{word}` before `$end`"),
            cursor,
        ));
    }
    scopes.pop(&block.cursor)
}

pub(super) fn parse_var(
    block: &Block,
    scopes: &ScopeStack,
    store: &mut WaveformStore,
) -> Result<(), VcdError> {
    // $var parameter 3 a IDLE $end
    // $var reg 32 b data [31:0] $end
    let (var_type, size, signal_id, local_name, bit_range) = match block.body.as_slice() {
        [var_type, size, signal_id, local_name] => {
            (var_type, size, signal_id, local_name, None)
        }
        [var_type, size, signal_id, local_name, (bit_range, _)] => {
            (var_type, size, signal_id, local_name, Some(bit_range.clone()))
        }
        body => {
            return Err(VcdError::malformed_decl(
                "var",
                format!(
                    "expected `<type> <size> <identifier> <name> [<range>]`, \
                     found {} word(s)",
                    body.len()
                ),
                &block.cursor,
            ))
        }
    };

    // $var parameter 3 a IDLE $end
    //      ^^^^^^^^^ - var_type
    let (word, cursor) = var_type;
    let signal_type = SignalType::from_word(word).ok_or_else(|| {
        VcdError::malformed_decl(
            "var",
            format!(
                "found type `{word}` but expected one of {:?}",
                SignalType::EXPECTED
            ),
            cursor,
        )
    })?;

    // $var parameter 3 a IDLE $end
    //                ^ - num_bits
    let (word, cursor) = size;
    let width = match word.parse::<u32>() {
        Ok(width) if width > 0 => width,
        _ => {
            return Err(VcdError::malformed_decl(
                "var",
                format!("size `{word}` is not a positive integer"),
                cursor,
            ))
        }
    };

    // $var parameter 3 a IDLE $end
    //                  ^ - signal_id
    //                    ^^^^ - local name
    let (signal_id, cursor) = signal_id;
    let (local_name, _) = local_name;
    let name = scopes.qualify(local_name);

    if store.id_for_name(&name).is_some() {
        return Err(VcdError::DuplicateSignal {
            signal: name,
            cursor: cursor.clone(),
        });
    }

    // Is the current variable an alias to a signal already encountered?
    // Simulators reuse an identifier for one net seen from several scopes.
    if let Some(signal_idx) = store.idx_of_id(signal_id) {
        let declared = store.signal_at(signal_idx).meta().width;
        if declared != width {
            return Err(VcdError::malformed_decl(
                "var",
                format!("`{signal_id}` was declared with {declared} bit(s), not {width}"),
                &size.1,
            ));
        }
        log::debug!("`{name}` aliases `{signal_id}`");
        store.add_alias(name, signal_idx);
        return Ok(());
    }

    let meta = SignalMeta::new(width, signal_type, bit_range);
    store.add_signal(Signal::new(signal_id.clone(), name, meta));

    Ok(())
}
