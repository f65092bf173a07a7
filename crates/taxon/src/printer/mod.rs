//! The formatter: a value tree in, canonical TAXON text out.
//!
//! Traversal is driven by an explicit work-stack of live iterators rather
//! than native recursion, mirroring the parser. The output is a single
//! line of pure ASCII with no whitespace between tokens.


use std::collections::hash_map;
use std::io;
use std::slice;

use bstr::BString;

use crate::options::Options;
use crate::sink::Sink;
use crate::value::Value;

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
const BASE64_DIGITS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A partially emitted aggregate.
enum Frame<'a> {
    Array(slice::Iter<'a, Value>),
    Object(hash_map::Iter<'a, BString, Value>),
}

pub(crate) fn write_value<K: Sink>(
    value: &Value,
    sink: &mut K,
    opts: Options,
) -> io::Result<()> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut current = value;

    'value: loop {
        match current {
            Value::Null => sink.put_bytes(b"null")?,
            Value::Boolean(true) => sink.put_bytes(b"true")?,
            Value::Boolean(false) => sink.put_bytes(b"false")?,
            Value::Integer(number) => {
                if opts.json_mode {
                    // As a floating-point number; inaccurate above 2^53.
                    write_display(sink, *number as f64)?;
                } else {
                    sink.put_bytes(b"\"$l:")?;
                    write_display(sink, *number)?;
                    sink.put_byte(b'"')?;
                }
            }
            Value::Number(number) => {
                if number.is_finite() {
                    write_display(sink, *number)?;
                } else if opts.json_mode {
                    sink.put_bytes(b"null")?;
                } else {
                    let spelling: &[u8] = if number.is_nan() {
                        b"nan"
                    } else if *number > 0.0 {
                        b"inf"
                    } else {
                        b"-inf"
                    };
                    sink.put_bytes(b"\"$d:")?;
                    sink.put_bytes(spelling)?;
                    sink.put_byte(b'"')?;
                }
            }
            Value::String(text) => {
                if !opts.json_mode && text.first() == Some(&b'$') {
                    sink.put_bytes(b"\"$s:")?;
                } else {
                    sink.put_byte(b'"')?;
                }
                write_escaped(sink, text)?;
                sink.put_byte(b'"')?;
            }
            Value::Binary(bytes) => {
                if opts.json_mode {
                    sink.put_bytes(b"null")?;
                } else {
                    write_binary(sink, bytes, opts)?;
                }
            }
            Value::Time(milliseconds) => {
                if opts.json_mode {
                    sink.put_bytes(b"null")?;
                } else {
                    sink.put_bytes(b"\"$t:")?;
                    write_display(sink, *milliseconds)?;
                    sink.put_byte(b'"')?;
                }
            }
            Value::Array(items) => {
                let mut iter = items.iter();
                if let Some(first) = iter.next() {
                    sink.put_byte(b'[')?;
                    stack.push(Frame::Array(iter));
                    current = first;
                    continue 'value;
                }
                sink.put_bytes(b"[]")?;
            }
            Value::Object(map) => {
                let mut iter = map.iter();
                if let Some((key, child)) = iter.next() {
                    sink.put_byte(b'{')?;
                    write_key(sink, key)?;
                    stack.push(Frame::Object(iter));
                    current = child;
                    continue 'value;
                }
                sink.put_bytes(b"{}")?;
            }
        }

        // The current value is done; advance to a sibling or close frames.
        loop {
            match stack.last_mut() {
                None => return Ok(()),
                Some(Frame::Array(iter)) => {
                    if let Some(next) = iter.next() {
                        sink.put_byte(b',')?;
                        current = next;
                        continue 'value;
                    }
                    sink.put_byte(b']')?;
                    stack.pop();
                }
                Some(Frame::Object(iter)) => {
                    if let Some((key, next)) = iter.next() {
                        sink.put_byte(b',')?;
                        write_key(sink, key)?;
                        current = next;
                        continue 'value;
                    }
                    sink.put_byte(b'}')?;
                    stack.pop();
                }
            }
        }
    }
}

fn write_display<K: Sink, T: std::fmt::Display>(sink: &mut K, value: T) -> io::Result<()> {
    sink.put_bytes(value.to_string().as_bytes())
}

fn write_key<K: Sink>(sink: &mut K, key: &BString) -> io::Result<()> {
    sink.put_byte(b'"')?;
    write_escaped(sink, key)?;
    sink.put_bytes(b"\":")
}

/// Writes string contents with escaping. Printable ASCII passes through
/// with `"` `\` `/` backslashed; the short escapes cover the usual control
/// characters; every other byte is decoded as UTF-8 and re-encoded as
/// UTF-16 `\uXXXX` units, with U+FFFD standing in for one undecodable
/// byte.
fn write_escaped<K: Sink>(sink: &mut K, text: &[u8]) -> io::Result<()> {
    let mut rest = text;
    while let Some(&byte) = rest.first() {
        match byte {
            b'"' | b'\\' | b'/' => {
                sink.put_bytes(&[b'\\', byte])?;
                rest = &rest[1..];
            }
            0x20..=0x7E => {
                sink.put_byte(byte)?;
                rest = &rest[1..];
            }
            0x08 => {
                sink.put_bytes(b"\\b")?;
                rest = &rest[1..];
            }
            0x0C => {
                sink.put_bytes(b"\\f")?;
                rest = &rest[1..];
            }
            b'\n' => {
                sink.put_bytes(b"\\n")?;
                rest = &rest[1..];
            }
            b'\r' => {
                sink.put_bytes(b"\\r")?;
                rest = &rest[1..];
            }
            b'\t' => {
                sink.put_bytes(b"\\t")?;
                rest = &rest[1..];
            }
            _ => match decode_scalar(rest) {
                Some((scalar, width)) => {
                    let mut units = [0u16; 2];
                    for unit in scalar.encode_utf16(&mut units) {
                        write_unit(sink, *unit)?;
                    }
                    rest = &rest[width..];
                }
                None => {
                    sink.put_bytes(b"\\uFFFD")?;
                    rest = &rest[1..];
                }
            },
        }
    }
    Ok(())
}

/// Decodes one scalar from the head of `bytes`, strictly: shortest form
/// only, no surrogates, nothing above U+10FFFF.
fn decode_scalar(bytes: &[u8]) -> Option<(char, usize)> {
    let lead = *bytes.first()?;
    if lead < 0x80 {
        return Some((lead as char, 1));
    }
    let (width, min, mut acc) = match lead {
        0xC0..=0xDF => (2, 0x80u32, u32::from(lead & 0x1F)),
        0xE0..=0xEF => (3, 0x800, u32::from(lead & 0x0F)),
        0xF0..=0xF7 => (4, 0x1_0000, u32::from(lead & 0x07)),
        _ => return None,
    };
    if bytes.len() < width {
        return None;
    }
    for &byte in &bytes[1..width] {
        if !(0x80..=0xBF).contains(&byte) {
            return None;
        }
        acc = acc << 6 | u32::from(byte & 0x3F);
    }
    if acc < min {
        return None;
    }
    char::from_u32(acc).map(|scalar| (scalar, width))
}

fn write_unit<K: Sink>(sink: &mut K, unit: u16) -> io::Result<()> {
    let mut escape = *b"\\u0000";
    for (slot, shift) in [12u32, 8, 4, 0].into_iter().enumerate() {
        escape[2 + slot] = HEX_UPPER[(usize::from(unit) >> shift) & 0xF];
    }
    sink.put_bytes(&escape)
}

/// Writes a binary payload as `"$h:…"` or `"$b:…"`. Hex is preferred for
/// sizes that look like short hashes, identifiers or UUIDs; everything
/// else goes to base64.
fn write_binary<K: Sink>(sink: &mut K, bytes: &[u8], opts: Options) -> io::Result<()> {
    let use_hex = !opts.bin_as_base64
        && (bytes.len() <= 4 || (bytes.len() % 4 == 0 && bytes.len() / 4 <= 8));
    if use_hex {
        sink.put_bytes(b"\"$h:")?;
        for &byte in bytes {
            sink.put_byte(HEX_LOWER[usize::from(byte >> 4)])?;
            sink.put_byte(HEX_LOWER[usize::from(byte & 0xF)])?;
        }
    } else {
        sink.put_bytes(b"\"$b:")?;
        for group in bytes.chunks(3) {
            let mut word = 0u32;
            for (slot, &byte) in group.iter().enumerate() {
                word |= u32::from(byte) << (16 - 8 * slot);
            }
            let mut quad = *b"====";
            for slot in 0..=group.len() {
                quad[slot] = BASE64_DIGITS[(word >> (18 - 6 * slot)) as usize & 0x3F];
            }
            sink.put_bytes(&quad)?;
        }
    }
    sink.put_byte(b'"')
}
