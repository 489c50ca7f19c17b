// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

mod vcd;
pub use vcd::codec::decode;
pub use vcd::error::VcdError;
pub use vcd::parse::{parse_vcd, parse_vcd_bytes, parse_vcd_with_options, ParseOptions};
pub use vcd::reader::Cursor;
pub use vcd::signal::{ChangeEvent, Signal, SignalMeta, SignalType};
pub use vcd::store::WaveformStore;
pub use vcd::types::{Metadata, TimeUnit, Timescale, Version};

pub use num::BigUint;
