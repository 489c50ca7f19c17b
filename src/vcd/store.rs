// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::HashMap;

use num::BigUint;

use super::error::VcdError;
use super::signal::{ChangeEvent, Signal};
use super::types::{Metadata, SignalIdx};

/// Every declared signal and its timeline, as decoded from one vcd file.
///
/// The store is filled by the two parser passes and is read-only once
/// [`parse_vcd`](crate::parse_vcd) hands it out, so it can be shared freely
/// between threads.
#[derive(Debug, Default)]
pub struct WaveformStore {
    pub(crate) metadata: Metadata,
    pub(crate) all_signals: Vec<Signal>,
    // wire identifier -> signal
    pub(crate) id_map: HashMap<String, SignalIdx>,
    // hierarchical name -> signal
    pub(crate) name_map: HashMap<String, SignalIdx>,
}

impl WaveformStore {
    pub(crate) fn add_signal(&mut self, signal: Signal) -> SignalIdx {
        let signal_idx = SignalIdx(self.all_signals.len());
        self.id_map.insert(signal.id().to_string(), signal_idx);
        self.name_map.insert(signal.name().to_string(), signal_idx);
        self.all_signals.push(signal);
        signal_idx
    }

    // another hierarchical name for a signal that is already stored
    pub(crate) fn add_alias(&mut self, name: String, signal_idx: SignalIdx) {
        self.name_map.insert(name, signal_idx);
    }

    pub(crate) fn signal_at(&self, SignalIdx(idx): SignalIdx) -> &Signal {
        &self.all_signals[idx]
    }

    pub(crate) fn signal_mut(&mut self, SignalIdx(idx): SignalIdx) -> &mut Signal {
        &mut self.all_signals[idx]
    }

    pub(crate) fn idx_of_id(&self, id: &str) -> Option<SignalIdx> {
        self.id_map.get(id).copied()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.all_signals.iter()
    }

    pub fn num_signals(&self) -> usize {
        self.all_signals.len()
    }

    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        let SignalIdx(idx) = self.name_map.get(name)?;
        Some(self.all_signals[*idx].id())
    }

    pub fn name_for_id(&self, id: &str) -> Option<&str> {
        let SignalIdx(idx) = self.id_map.get(id)?;
        Some(self.all_signals[*idx].name())
    }

    /// Looks up a signal by hierarchical name, falling back to its wire
    /// identifier.
    pub fn signal(&self, name_or_id: &str) -> Result<&Signal, VcdError> {
        let SignalIdx(idx) = self
            .name_map
            .get(name_or_id)
            .or_else(|| self.id_map.get(name_or_id))
            .ok_or_else(|| VcdError::UnknownSignal {
                signal: name_or_id.to_string(),
                cursor: None,
            })?;
        Ok(&self.all_signals[*idx])
    }

    pub fn bit_width(&self, name_or_id: &str) -> Result<u32, VcdError> {
        Ok(self.signal(name_or_id)?.meta().width)
    }

    pub fn nibble_width(&self, name_or_id: &str) -> Result<u32, VcdError> {
        Ok(self.signal(name_or_id)?.meta().nibble_width)
    }

    pub fn event_at(&self, name_or_id: &str, time: &BigUint) -> Result<&ChangeEvent, VcdError> {
        Ok(self.signal(name_or_id)?.event_at(time))
    }

    /// The value `name_or_id` holds at `time`.
    pub fn value_at(&self, name_or_id: &str, time: &BigUint) -> Result<&str, VcdError> {
        Ok(&self.event_at(name_or_id, time)?.value)
    }

    /// Detects the period of the clock named `clock`, `None` if the
    /// signal does not toggle around the middle of its timeline.
    pub fn clock_period(&self, clock: &str) -> Result<Option<BigUint>, VcdError> {
        let signal = self.signal(clock)?;
        let period = signal.clock_period();
        if period.is_none() {
            log::warn!(
                "could not detect a clock period for `{}` from its {} recorded event(s)",
                signal.name(),
                signal.events().len()
            );
        }
        Ok(period)
    }

    /// Samples `name_or_id` `count` times at `start`, `start + step`, ...
    pub fn sample_periodic(
        &self,
        name_or_id: &str,
        start: &BigUint,
        step: &BigUint,
        count: usize,
    ) -> Result<Vec<(BigUint, &str)>, VcdError> {
        let signal = self.signal(name_or_id)?;

        let mut samples = vec![];
        let mut time = start.clone();
        for _ in 0..count {
            let value = signal.event_at(&time).value.as_str();
            samples.push((time.clone(), value));
            time += step;
        }
        Ok(samples)
    }
}
