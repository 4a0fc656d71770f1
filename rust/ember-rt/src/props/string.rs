//! Props of `str` values.
//!
//! Lengths, indices and slices count extended grapheme clusters unless a
//! prop says otherwise. `to_char_arr`, `to_charcode_arr`, `charcode_at` and
//! `codepoint_at` work on UTF-16 code units and are kept for compatibility.

use ember_core::{RuntimeResult, Str, Value};

use super::{Handler, Props};
use crate::validate::{exact_index, expect_num, expect_str, opt_num, opt_str, to_index};

pub(super) fn register(props: &mut Props<Str>) {
    props.insert("to_num", Handler::Method(to_num));
    props.insert("to_arr", Handler::Method(to_arr));
    props.insert("to_unicode_arr", Handler::Method(to_unicode_arr));
    props.insert("to_unicode_codepoint_arr", Handler::Method(to_unicode_codepoint_arr));
    props.insert("to_char_arr", Handler::Method(to_char_arr));
    props.insert("to_charcode_arr", Handler::Method(to_charcode_arr));
    props.insert("to_utf8_byte_arr", Handler::Method(to_utf8_byte_arr));
    props.insert("len", Handler::Attr(len));
    props.insert("replace", Handler::Method(replace));
    props.insert("index_of", Handler::Method(index_of));
    props.insert("incl", Handler::Method(incl));
    props.insert("trim", Handler::Method(trim));
    props.insert("upper", Handler::Method(upper));
    props.insert("lower", Handler::Method(lower));
    props.insert("split", Handler::Method(split));
    props.insert("slice", Handler::Method(slice));
    props.insert("pick", Handler::Method(pick));
    props.insert("charcode_at", Handler::Method(charcode_at));
    props.insert("codepoint_at", Handler::Method(codepoint_at));
}

/// Script whitespace: Unicode `White_Space` minus U+0085 (NEL), plus the
/// byte order mark.
fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

fn str_arr<'a>(parts: impl Iterator<Item = &'a str>) -> Value {
    Value::arr(parts.map(Value::str).collect())
}

fn num_arr(nums: impl Iterator<Item = f64>) -> Value {
    Value::arr(nums.map(Value::Num).collect())
}

/// Non-negative grapheme position from a script number; negatives clamp to 0.
fn clamp_index(n: f64) -> usize {
    usize::try_from(to_index(n).max(0)).unwrap_or(usize::MAX)
}

/// Sign and leading decimal digit run after optional whitespace.
fn parse_leading_int(s: &str) -> Option<f64> {
    let t = s.trim_start_matches(is_space);
    let (negative, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let n: f64 = digits[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

fn to_num(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(parse_leading_int(s.as_str()).map_or(Value::Null, Value::Num))
}

fn to_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(str_arr(s.graphemes()))
}

fn to_unicode_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::arr(s.chars().map(|c| Value::str(c.to_string())).collect()))
}

fn to_unicode_codepoint_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(num_arr(s.chars().map(|c| f64::from(u32::from(c)))))
}

// A lone surrogate cannot live in a UTF-8 string; it becomes U+FFFD.
fn to_char_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::arr(
        s.utf16_units()
            .into_iter()
            .map(|u| Value::str(String::from_utf16_lossy(&[u])))
            .collect(),
    ))
}

fn to_charcode_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(num_arr(s.utf16_units().into_iter().map(f64::from)))
}

fn to_utf8_byte_arr(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(num_arr(s.bytes().iter().map(|b| f64::from(*b))))
}

fn len(s: &Str) -> Value {
    Value::Num(s.grapheme_len() as f64)
}

fn replace(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let from = expect_str(args, 0)?;
    let to = expect_str(args, 1)?;
    if from.is_empty() {
        // an empty pattern matches between every code point
        let mut out = String::with_capacity(s.as_str().len());
        for (i, c) in s.chars().enumerate() {
            if i > 0 {
                out.push_str(to.as_str());
            }
            out.push(c);
        }
        return Ok(Value::str(out));
    }
    Ok(Value::str(s.as_str().replace(from.as_str(), to.as_str())))
}

fn index_of(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let search = expect_str(args, 0)?;
    let from = match opt_num(args, 1)? {
        None => 0,
        Some(n) => {
            let i = to_index(n);
            if i < 0 {
                (s.grapheme_len() as i64).saturating_add(i).max(0) as usize
            } else {
                clamp_index(n)
            }
        }
    };
    Ok(Value::Num(
        s.grapheme_index_of(&search, from)
            .map_or(-1.0, |i| i as f64),
    ))
}

fn incl(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let search = expect_str(args, 0)?;
    Ok(Value::Bool(s.as_str().contains(search.as_str())))
}

fn trim(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::str(s.as_str().trim_matches(is_space)))
}

fn upper(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::str(s.as_str().to_uppercase()))
}

fn lower(s: &Str, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::str(s.as_str().to_lowercase()))
}

fn split(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    match opt_str(args, 0)? {
        Some(sep) if !sep.is_empty() => Ok(str_arr(s.as_str().split(sep.as_str()))),
        _ => Ok(str_arr(s.graphemes())),
    }
}

fn slice(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let begin = expect_num(args, 0)?;
    let end = expect_num(args, 1)?;
    Ok(Value::str(s.grapheme_slice(clamp_index(begin), clamp_index(end))))
}

fn pick(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let i = expect_num(args, 0)?;
    Ok(exact_index(i)
        .and_then(|i| s.grapheme(i))
        .map_or(Value::Null, Value::str))
}

/// UTF-16 position from a script number; `None` when negative.
fn unit_index(n: f64) -> Option<usize> {
    usize::try_from(to_index(n)).ok()
}

fn charcode_at(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let i = expect_num(args, 0)?;
    Ok(unit_index(i)
        .and_then(|i| s.code_unit_at(i))
        .map_or(Value::Null, |u| Value::Num(f64::from(u))))
}

fn codepoint_at(s: &Str, args: &[Value]) -> RuntimeResult<Value> {
    let i = expect_num(args, 0)?;
    Ok(unit_index(i)
        .and_then(|i| s.code_point_at(i))
        .map_or(Value::Null, |c| Value::Num(f64::from(c))))
}
