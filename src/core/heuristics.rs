//! Byte-level guesses about the stringdex payloads.
//!
//! None of these is a decoder. They surface patterns (ASCII runs,
//! UTF-16LE-looking strings, small integers) for a human to look at.

fn is_printable(b: u8) -> bool {
    (32..127).contains(&b)
}

pub fn hex_preview(bytes: &[u8], limit: usize) -> String {
    bytes
        .iter()
        .take(limit)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn ascii_preview(bytes: &[u8], limit: usize) -> String {
    bytes
        .iter()
        .take(limit)
        .map(|&b| if is_printable(b) { b as char } else { '.' })
        .collect()
}

/// Printable ASCII runs inside the first `window` bytes, split on NUL or
/// any other non-printable byte. Single characters are dropped. A run still
/// open when the window ends is kept, so the count can exceed a scan that
/// only counts terminated runs.
pub fn printable_runs(bytes: &[u8], window: usize) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for &b in bytes.iter().take(window) {
        if is_printable(b) {
            current.push(b as char);
        } else {
            flush_run(&mut current, &mut runs);
        }
    }
    flush_run(&mut current, &mut runs);

    runs
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    if current.len() > 1 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// LEB128: seven bits per byte, least significant group first, high bit set
/// on every byte but the last. Returns the value and the offset after it.
pub fn read_varint(data: &[u8], mut offset: usize) -> (u64, usize) {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    while let Some(&byte) = data.get(offset) {
        offset += 1;
        if shift < 64 {
            result |= u64::from(byte & 0x7f) << shift;
        }
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    (result, offset)
}

/// Reads UTF-16LE units from `offset` up to a `00 00` unit, or until fewer
/// than two bytes are left. Surrogate pairs combine; lone surrogates become U+FFFD.
pub fn read_utf16_until_nul(data: &[u8], mut offset: usize) -> (String, usize) {
    let mut units = Vec::new();

    while offset + 1 < data.len() {
        let unit = u16::from_le_bytes([data[offset], data[offset + 1]]);
        offset += 2;
        if unit == 0 {
            break;
        }
        units.push(unit);
    }

    let out = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    (out, offset)
}

/// Guesses NUL-terminated UTF-16LE strings: wherever a printable byte is
/// followed by `00`, try reading one.
pub fn extract_utf16_strings(data: &[u8]) -> Vec<String> {
    let mut strings = Vec::new();
    let mut i = 0;

    while i < data.len() {
        if i + 1 < data.len() && is_printable(data[i]) && data[i + 1] == 0 {
            let (s, next) = read_utf16_until_nul(data, i);
            if s.chars().count() > 1 {
                strings.push(s);
                i = next;
                continue;
            }
        }
        i += 1;
    }

    strings
}

/// Little-endian 16-bit words; an odd trailing byte stands on its own.
pub fn le_u16_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|chunk| match *chunk {
            [lo, hi] => u16::from_le_bytes([lo, hi]),
            [lo] => u16::from(lo),
            _ => 0,
        })
        .collect()
}

/// `E` payloads: 16-bit words when the length allows it, plain bytes otherwise.
pub fn offset_table(bytes: &[u8]) -> Vec<u16> {
    if bytes.len() % 2 == 0 {
        le_u16_words(bytes)
    } else {
        bytes.iter().map(|&b| u16::from(b)).collect()
    }
}
