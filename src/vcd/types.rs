// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use chrono::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    pub(crate) fn from_word(word: &str) -> Option<TimeUnit> {
        match word {
            "fs" => Some(TimeUnit::Fs),
            "ps" => Some(TimeUnit::Ps),
            "ns" => Some(TimeUnit::Ns),
            "us" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }
}

/// `$timescale 10 ns $end` becomes `Timescale { magnitude: 10, unit: Ns }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timescale {
    pub magnitude: u32,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub date: Option<DateTime<Utc>>,
    pub version: Option<Version>,
    pub timescale: Option<Timescale>,
    pub comments: Vec<String>,
}

/// Position of a signal within [`WaveformStore`](super::store::WaveformStore).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SignalIdx(pub(crate) usize);
