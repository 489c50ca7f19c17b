// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

pub const FILES: [&str; 3] = [
    "./tests/vcd-files/ghdl/nameless_scope.vcd",
    "./tests/vcd-files/icarus/counter.vcd",
    "./tests/vcd-files/verilator/pipeline.vcd",
];

pub const MALFORMED_FILES: [&str; 4] = [
    "./tests/vcd-files/malformed/extra_upscope.vcd",
    "./tests/vcd-files/malformed/short_var.vcd",
    "./tests/vcd-files/malformed/unknown_signal.vcd",
    "./tests/vcd-files/malformed/width_mismatch.vcd",
];
