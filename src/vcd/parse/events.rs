// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that replays the value changes into the store
use num::BigUint;

use super::super::codec::decode;
use super::super::error::VcdError;
use super::super::reader::{Cursor, TokenSource};
use super::super::store::WaveformStore;
use super::super::types::SignalIdx;
use super::blocks::{BlockScanner, Item};

fn lookup(store: &WaveformStore, signal_id: &str, cursor: &Cursor) -> Result<SignalIdx, VcdError> {
    store
        .idx_of_id(signal_id)
        .ok_or_else(|| VcdError::UnknownSignal {
            signal: signal_id.to_string(),
            cursor: Some(cursor.clone()),
        })
}

// the word a record continues with, e.g. the identifier after `b1010`
fn record_word<T: TokenSource>(
    scanner: &mut BlockScanner<T>,
    record: &str,
    cursor: &Cursor,
    what: &str,
) -> Result<(String, Cursor), VcdError> {
    scanner
        .next_loose_word()?
        .ok_or_else(|| VcdError::malformed_change(record, format!("missing {what}"), cursor))
}

/// Records every value change into `store`. Returns the number of
/// changes recorded.
///
/// Declaration blocks were taken care of by the header pass and are
/// skipped here, so this can run over the whole file.
pub(super) fn parse_events<T: TokenSource>(
    scanner: &mut BlockScanner<T>,
    store: &mut WaveformStore,
) -> Result<usize, VcdError> {
    let mut curr_time = BigUint::default();
    let mut num_changes = 0usize;

    while let Some(item) = scanner.next_item()? {
        let (word, cursor) = match item {
            Item::Block(_) => continue,
            Item::Word(word, cursor) => (word, cursor),
        };

        let Some(first) = word.chars().next() else {
            continue;
        };
        match first {
            // `$dumpvars`, `$end` and friends
            '$' => {}

            // #1250
            '#' => {
                let digits = &word[1..];
                let time = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    BigUint::parse_bytes(digits.as_bytes(), 10)
                } else {
                    None
                };
                let time = time.ok_or_else(|| {
                    VcdError::malformed_change(&word, "time is not a non-negative integer", &cursor)
                })?;
                if time < curr_time {
                    return Err(VcdError::NonMonotonicTime {
                        current: curr_time,
                        found: time,
                        cursor,
                    });
                }
                curr_time = time;
            }

            // 1!
            '0' | '1' | 'x' | 'X' | 'z' | 'Z' => {
                let signal_id = &word[1..];
                if signal_id.is_empty() {
                    return Err(VcdError::malformed_change(&word, "missing identifier", &cursor));
                }

                let signal_idx = lookup(store, signal_id, &cursor)?;
                let signal = store.signal_mut(signal_idx);
                let width = signal.meta().width;
                if width != 1 {
                    return Err(VcdError::WidthMismatch {
                        signal: signal.name().to_string(),
                        declared: width,
                        observed: 1,
                        cursor,
                    });
                }

                signal.push(curr_time.clone(), first.to_ascii_lowercase().to_string());
                num_changes += 1;
            }

            // b1010 ! (or b 1010 !)
            'b' | 'B' => {
                let bits = if word.len() == 1 {
                    record_word(scanner, &word, &cursor, "bit string")?.0
                } else {
                    word[1..].to_string()
                };
                let (signal_id, id_cursor) = record_word(scanner, &word, &cursor, "identifier")?;

                let signal_idx = lookup(store, &signal_id, &id_cursor)?;
                let signal = store.signal_mut(signal_idx);
                let meta = signal.meta();
                if bits.len() > meta.width as usize {
                    return Err(VcdError::WidthMismatch {
                        signal: signal.name().to_string(),
                        declared: meta.width,
                        observed: bits.len(),
                        cursor,
                    });
                }

                let value = decode(&bits, meta.nibble_width as usize);
                signal.push(curr_time.clone(), value);
                num_changes += 1;
            }

            // real and string values aren't decoded, but their identifier
            // still has to be consumed
            'r' | 'R' | 's' | 'S' => {
                let (signal_id, _) = record_word(scanner, &word, &cursor, "identifier")?;
                log::debug!("skipping value `{word}` of `{signal_id}` at {cursor}");
            }

            _ => log::debug!("ignoring `{word}` at {cursor}"),
        }
    }

    Ok(num_changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::reader::WordReader;
    use crate::vcd::signal::{Signal, SignalMeta, SignalType};
    use pretty_assertions::assert_eq;

    fn store() -> WaveformStore {
        let mut store = WaveformStore::default();
        for (id, name, width) in [("!", "top.clk", 1), ("\"", "top.nib", 4), ("$", "top.bus", 12)] {
            store.add_signal(Signal::new(
                id.to_string(),
                name.to_string(),
                SignalMeta::new(width, SignalType::Wire, None),
            ));
        }
        store
    }

    fn run(body: &str, chunk_size: usize) -> Result<(WaveformStore, usize), VcdError> {
        let mut store = store();
        let reader = WordReader::with_chunk_size(body.as_bytes(), chunk_size);
        let mut scanner = BlockScanner::new(reader, None);
        let num_changes = parse_events(&mut scanner, &mut store)?;
        Ok((store, num_changes))
    }

    fn timeline(store: &WaveformStore, name: &str) -> Vec<(u32, String)> {
        store
            .signal(name)
            .unwrap()
            .events()
            .iter()
            .map(|event| (u32::try_from(&event.time).unwrap(), event.value.clone()))
            .collect()
    }

    fn at(time: u32, value: &str) -> (u32, String) {
        (time, value.to_string())
    }

    const BODY: &str = "\
$scope module top $end
$var wire 1 ! clk $end
$upscope $end
$enddefinitions $end
$comment 1! is not a record in here $end
$dumpvars
x!
bx \"
b0 $
$end
#5
1!
b101x \"
b1111000010 $
#10
Z!
b 0110 \"
r1.5 %
#15
";

    #[test]
    fn replays_value_changes() {
        let (store, num_changes) = run(BODY, 4096).unwrap();
        assert_eq!(num_changes, 8);
        assert_eq!(
            timeline(&store, "top.clk"),
            vec![at(0, "x"), at(0, "x"), at(5, "1"), at(10, "z")]
        );
        assert_eq!(
            timeline(&store, "top.nib"),
            vec![at(0, "x"), at(0, "x"), at(5, "x"), at(10, "6")]
        );
        assert_eq!(
            timeline(&store, "top.bus"),
            vec![at(0, "xxx"), at(0, "000"), at(5, "3c2")]
        );
    }

    #[test]
    fn chunking_does_not_change_the_result() {
        let (expected, _) = run(BODY, 4096).unwrap();
        for chunk_size in [1, 2, 3, 5, 7, 16] {
            let (store, _) = run(BODY, chunk_size).unwrap();
            for name in ["top.clk", "top.nib", "top.bus"] {
                assert_eq!(timeline(&store, name), timeline(&expected, name));
            }
        }
    }

    #[test]
    fn scalar_on_vector_is_width_mismatch() {
        match run("#0\n1\"\n", 64) {
            Err(VcdError::WidthMismatch {
                signal,
                declared,
                observed,
                cursor,
            }) => {
                assert_eq!(signal, "top.nib");
                assert_eq!((declared, observed), (4, 1));
                assert_eq!(cursor.line(), 2);
            }
            other => panic!("expected width mismatch, got {:?}", other.map(|(_, n)| n)),
        }
    }

    #[test]
    fn too_many_bits_is_width_mismatch() {
        assert!(matches!(
            run("b10101 \"", 64),
            Err(VcdError::WidthMismatch { declared: 4, observed: 5, .. })
        ));
    }

    #[test]
    fn undeclared_identifier() {
        match run("#0\n0!\n1?\n", 64) {
            Err(VcdError::UnknownSignal { signal, cursor }) => {
                assert_eq!(signal, "?");
                assert_eq!(cursor.map(|c| c.line()), Some(3));
            }
            other => panic!("expected unknown signal, got {:?}", other.map(|(_, n)| n)),
        }
    }

    #[test]
    fn malformed_records() {
        for body in ["#", "#-5", "#1e3", "#1_0", "#+12", "1", "b1010", "b"] {
            assert!(
                matches!(run(body, 64), Err(VcdError::MalformedValueChange { .. })),
                "{body}"
            );
        }
    }

    #[test]
    fn time_never_goes_backwards() {
        assert!(matches!(
            run("#10 1! #5 0!", 64),
            Err(VcdError::NonMonotonicTime { .. })
        ));
        // repeating a timestamp is fine
        assert!(run("#10 1! #10 0!", 64).is_ok());
    }

    #[test]
    fn huge_timestamps() {
        let (store, _) = run("#123456789012345678901234567890 1!", 64).unwrap();
        let last = store.signal("top.clk").unwrap().events().last().unwrap().clone();
        assert_eq!(last.time.to_string(), "123456789012345678901234567890");
    }
}
