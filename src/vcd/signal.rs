// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use num::BigUint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    Event,
    Integer,
    Parameter,
    Real,
    RealTime,
    Reg,
    Str,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    SVInt,
    SVShortInt,
    SVLongInt,
    SVChar,
    SVLogic,
    SVBit,
    SVShortReal,
}

impl SignalType {
    pub(crate) const EXPECTED: [&'static str; 29] = [
        "event",
        "integer",
        "parameter",
        "real",
        "realtime",
        "reg",
        "string",
        "supply0",
        "supply1",
        "time",
        "tri",
        "triand",
        "trior",
        "trireg",
        "tri0",
        "tri1",
        "wand",
        "wire",
        "wor",
        "int",
        "int_s",
        "shortint",
        "int_l",
        "longint",
        "char",
        "byte",
        "logic",
        "bit",
        "shortreal",
    ];

    pub(crate) fn from_word(word: &str) -> Option<SignalType> {
        let signal_type = match word {
            "event" => SignalType::Event,
            "integer" => SignalType::Integer,
            "parameter" => SignalType::Parameter,
            "real" => SignalType::Real,
            "realtime" => SignalType::RealTime,
            "reg" => SignalType::Reg,
            "string" => SignalType::Str,
            "supply0" => SignalType::Supply0,
            "supply1" => SignalType::Supply1,
            "time" => SignalType::Time,
            "tri" => SignalType::Tri,
            "triand" => SignalType::TriAnd,
            "trior" => SignalType::TriOr,
            "trireg" => SignalType::TriReg,
            "tri0" => SignalType::Tri0,
            "tri1" => SignalType::Tri1,
            "wand" => SignalType::WAnd,
            "wire" => SignalType::Wire,
            "wor" => SignalType::WOr,
            "int" => SignalType::SVInt,
            "int_s" | "shortint" => SignalType::SVShortInt,
            "int_l" | "longint" => SignalType::SVLongInt,
            "char" | "byte" => SignalType::SVChar,
            "logic" => SignalType::SVLogic,
            "bit" => SignalType::SVBit,
            "shortreal" => SignalType::SVShortReal,
            _ => return None,
        };
        Some(signal_type)
    }
}

/// Declaration-time facts about a signal. Never changes after the header pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalMeta {
    pub width: u32,
    pub nibble_width: u32,
    pub signal_type: SignalType,
    // the optional `[31:0]` that may follow the local name
    pub bit_range: Option<String>,
}

impl SignalMeta {
    pub(crate) fn new(width: u32, signal_type: SignalType, bit_range: Option<String>) -> SignalMeta {
        SignalMeta {
            width,
            nibble_width: width.div_ceil(4),
            signal_type,
            bit_range,
        }
    }
}

/// A value a signal takes on at `time` and holds until its next change.
///
/// 1 bit signals hold a single `0`, `1`, `x` or `z` character. Wider
/// signals hold `nibble_width` hex digits where unknown nibbles are `x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub time: BigUint,
    pub value: String,
}

#[derive(Debug)]
pub struct Signal {
    id: String,
    name: String,
    meta: SignalMeta,
    // sorted by time, never empty: the first entry is the all `x` value
    // every signal starts with at time 0
    events: Vec<ChangeEvent>,
}

impl Signal {
    pub(crate) fn new(id: String, name: String, meta: SignalMeta) -> Signal {
        let initial = ChangeEvent {
            time: BigUint::default(),
            value: "x".repeat(meta.nibble_width as usize),
        };
        Signal {
            id,
            name,
            meta,
            events: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, time: BigUint, value: String) {
        debug_assert!(self.events.last().map_or(true, |last| last.time <= time));
        self.events.push(ChangeEvent { time, value });
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &SignalMeta {
        &self.meta
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    /// The last event at or before `time`.
    ///
    /// Queries past the end of the timeline get the final event. When
    /// several events share a timestamp, the one recorded last wins.
    pub fn event_at(&self, time: &BigUint) -> &ChangeEvent {
        // number of events with `event.time <= time`, at least 1 since the
        // initial event sits at time 0
        let after = self.events.partition_point(|event| event.time <= *time);
        &self.events[after.saturating_sub(1)]
    }

    /// Period of a clock, sampled around the middle of the timeline.
    ///
    /// Returns twice the distance between the middle event and the one
    /// after it, or `None` if there is no such pair, the two values are
    /// equal, or both sit at the same time.
    pub fn clock_period(&self) -> Option<BigUint> {
        let mid = self.events.len() / 2;
        let (curr, next) = (self.events.get(mid)?, self.events.get(mid + 1)?);

        if curr.value == next.value || curr.time >= next.time {
            return None;
        }

        Some((&next.time - &curr.time) * 2u32)
    }
}
