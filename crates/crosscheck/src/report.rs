//! Console output for a finished comparison.

use crate::scenario::Comparison;
use serde_json::{json, Value};
use std::io::{self, Write};

/// Write both tables as `word:count` lines under `FromUI:` / `FromAPI:`.
pub fn write_plain<W: Write>(out: &mut W, cmp: &Comparison) -> io::Result<()> {
    writeln!(out, "FromUI: ")?;
    write!(out, "{}", cmp.ui)?;
    writeln!(out, "\n\n\nFromAPI: ")?;
    write!(out, "{}", cmp.api)?;
    writeln!(
        out,
        "\nunique words: ui={} api={} -> {}",
        cmp.ui.unique(),
        cmp.api.unique(),
        if cmp.passed() { "PASS" } else { "FAIL" }
    )
}

/// Write [`to_json`] pretty-printed, followed by a newline.
pub fn write_json<W: Write>(out: &mut W, cmp: &Comparison) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &to_json(cmp))?;
    writeln!(out)
}

/// Machine-readable form of the comparison.
pub fn to_json(cmp: &Comparison) -> Value {
    json!({
        "ui": cmp.ui,
        "api": cmp.api,
        "ui_unique": cmp.ui.unique(),
        "api_unique": cmp.api.unique(),
        "passed": cmp.passed(),
    })
}
