//! Group list files: one source group key (id or email) per line.
//!
//! UTF-8 with or without BOM, and UTF-16 LE/BE with BOM, are accepted.
//! Surrounding whitespace and blank lines are ignored; repeated keys are
//! kept once, in first-seen order.

use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];

/// Read the group keys listed in `path`
pub fn read(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
    let text = decode(&bytes).with_context(|| format!("Could not decode {}", path.display()))?;
    let keys = parse(&text);
    log::debug!("Group list {}: {} key(s)", path.display(), keys.len());
    Ok(keys)
}

fn decode(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(BOM_UTF8) {
        return Ok(String::from_utf8(rest.to_vec())?);
    }
    if let Some(rest) = bytes.strip_prefix(BOM_UTF16_BE) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(BOM_UTF16_LE) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        bail!("truncated UTF-16 text ({} bytes)", bytes.len());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

fn parse(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}
