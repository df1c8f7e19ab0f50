// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a finished mask into something to look at.

use std::io::{self, Write};

use crate::mask::StabilityMask;

const STABLE: char = '.';
const UNSTABLE: char = ' ';

/// One character per cell, one line per row, first row first.
pub fn render_ascii(mask: &StabilityMask) -> String {
    let mut chart = String::with_capacity(mask.len() + mask.rows());
    for row in mask.iter_rows() {
        chart.extend(row.iter().map(|&stable| if stable { STABLE } else { UNSTABLE }));
        chart.push('\n');
    }
    chart
}

/// Writes the ASCII chart to any writer.
pub fn write_ascii<W: Write>(mask: &StabilityMask, out: &mut W) -> io::Result<()> {
    out.write_all(render_ascii(mask).as_bytes())?;
    out.flush()
}

/// Eight-bit gray levels for an image of the mask: stable cells
/// white, the rest black.
pub fn to_graymap(mask: &StabilityMask) -> Vec<u8> {
    mask.as_slice()
        .iter()
        .map(|&stable| if stable { 255 } else { 0 })
        .collect()
}
