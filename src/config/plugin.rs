//! Plugin section writer for JSON config files
//!
//! Sets `plugins.<name>` by splicing the raw document text. Everything
//! outside the replaced value keeps its original bytes, including sibling
//! plugins and the file's own formatting.

use crate::config::FileFormat;
use crate::error::{Result, StarterError};
use crate::system::System;
use serde::Serialize;
use serde::de::IgnoredAny;
use std::path::Path;
use tracing::debug;

/// Top-level key holding every plugin's section
pub const PLUGINS_KEY: &str = "plugins";

/// Write `cfg` as the `plugins.<plugin_name>` entry of the JSON file at `path`
///
/// `plugin_name` is a single literal key; dots in it do not nest.
///
/// # Errors
///
/// Returns an error if:
/// - `path` is not a `.json` file, the document is malformed, or its root is not an object (format error)
/// - The file cannot be read or written (I/O error)
#[inline]
pub fn merge_plugin_config<P, T>(
    system: &dyn System,
    plugin_name: &str,
    path: P,
    cfg: &T,
) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    if FileFormat::from_path(path) != Some(FileFormat::Json) {
        return Err(StarterError::format(format!(
            "plugin configuration merging is only supported for JSON files, got {}",
            path.display()
        )));
    }

    let content = system
        .read_to_string(path)
        .map_err(|e| StarterError::io(path, e))?;

    let value = serde_json::to_string(cfg)
        .map_err(|e| StarterError::format(format!("cannot encode plugin config: {e}")))?;

    let updated = set_json_path(&content, &[PLUGINS_KEY, plugin_name], &value)?;

    system
        .write(path, updated.as_bytes())
        .map_err(|e| StarterError::io(path, e))?;

    debug!(plugin = plugin_name, path = %path.display(), "merged plugin config");
    Ok(())
}

/// Set the member addressed by `keys` in `doc` to the JSON text `value`
///
/// Missing objects along the way are created; a non-object found where an
/// object is needed is replaced. A blank document is treated as `{}`.
///
/// # Errors
///
/// Returns a format error if `doc` is not valid JSON or its root is not an object.
#[inline]
pub fn set_json_path(doc: &str, keys: &[&str], value: &str) -> Result<String> {
    if doc.trim().is_empty() {
        return nested(keys, value);
    }

    serde_json::from_str::<IgnoredAny>(doc)
        .map_err(|e| StarterError::format(format!("invalid JSON: {e}")))?;

    let scanner = Scanner::new(doc);
    let root = scanner.skip_ws(0);
    if scanner.byte(root)? != b'{' {
        return Err(StarterError::format("JSON document root is not an object"));
    }

    set_in_object(&scanner, root, keys, value)
}

fn set_in_object(scanner: &Scanner<'_>, open: usize, keys: &[&str], value: &str) -> Result<String> {
    let Some((key, rest)) = keys.split_first() else {
        return Ok(scanner.splice(open, scanner.skip_value(open)?, value));
    };

    let (members, close) = scanner.members(open)?;

    // duplicate keys: the last one is the one a decoder keeps
    if let Some(member) = members.iter().rev().find(|m| m.key == *key) {
        if rest.is_empty() {
            return Ok(scanner.splice(member.value_start, member.value_end, value));
        }
        if scanner.byte(member.value_start)? == b'{' {
            return set_in_object(scanner, member.value_start, rest, value);
        }
        let replacement = nested(rest, value)?;
        return Ok(scanner.splice(member.value_start, member.value_end, &replacement));
    }

    let entry = format!("{}:{}", quote(key)?, nested(rest, value)?);
    Ok(match members.last() {
        Some(last) => scanner.splice(last.value_end, last.value_end, &format!(",{entry}")),
        None => scanner.splice(close, close, &entry),
    })
}

/// `value` wrapped in one object per key, innermost last
fn nested(keys: &[&str], value: &str) -> Result<String> {
    let mut out = value.to_owned();
    for key in keys.iter().rev() {
        out = format!("{{{}:{out}}}", quote(key)?);
    }
    Ok(out)
}

fn quote(key: &str) -> Result<String> {
    serde_json::to_string(key)
        .map_err(|e| StarterError::format(format!("cannot encode key '{key}': {e}")))
}

struct Member {
    key: String,
    value_start: usize,
    value_end: usize,
}

/// Byte-level walker over a document already known to be valid JSON
struct Scanner<'a> {
    text: &'a str,
}

impl<'a> Scanner<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn byte(&self, pos: usize) -> Result<u8> {
        self.text
            .as_bytes()
            .get(pos)
            .copied()
            .ok_or_else(|| StarterError::format("unexpected end of JSON document"))
    }

    fn skip_ws(&self, mut pos: usize) -> usize {
        while let Some(b) = self.text.as_bytes().get(pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// End of the string starting at the quote at `pos`
    fn skip_string(&self, pos: usize) -> Result<usize> {
        let mut i = pos + 1;
        loop {
            match self.byte(i)? {
                b'\\' => i += 2,
                b'"' => return Ok(i + 1),
                _ => i += 1,
            }
        }
    }

    /// End of the value starting at `pos`
    fn skip_value(&self, pos: usize) -> Result<usize> {
        match self.byte(pos)? {
            b'"' => self.skip_string(pos),
            b'{' | b'[' => {
                let mut depth = 0_usize;
                let mut i = pos;
                loop {
                    match self.byte(i)? {
                        b'"' => {
                            i = self.skip_string(i)?;
                            continue;
                        }
                        b'{' | b'[' => depth += 1,
                        b'}' | b']' => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(i + 1);
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => {
                let mut i = pos;
                while let Some(b) = self.text.as_bytes().get(i) {
                    if matches!(b, b',' | b'}' | b']') || b.is_ascii_whitespace() {
                        break;
                    }
                    i += 1;
                }
                Ok(i)
            }
        }
    }

    /// Members of the object opening at `open`, plus the index of its `}`
    fn members(&self, open: usize) -> Result<(Vec<Member>, usize)> {
        let mut members = Vec::new();
        let mut i = self.skip_ws(open + 1);
        if self.byte(i)? == b'}' {
            return Ok((members, i));
        }

        loop {
            let key_end = self.skip_string(i)?;
            let key: String = serde_json::from_str(&self.text[i..key_end])
                .map_err(|e| StarterError::format(format!("invalid JSON key: {e}")))?;

            i = self.skip_ws(key_end);
            if self.byte(i)? != b':' {
                return Err(StarterError::format("expected ':' after JSON key"));
            }
            let value_start = self.skip_ws(i + 1);
            let value_end = self.skip_value(value_start)?;
            members.push(Member {
                key,
                value_start,
                value_end,
            });

            i = self.skip_ws(value_end);
            match self.byte(i)? {
                b',' => i = self.skip_ws(i + 1),
                b'}' => return Ok((members, i)),
                _ => return Err(StarterError::format("expected ',' or '}' in JSON object")),
            }
        }
    }

    fn splice(&self, start: usize, end: usize, replacement: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + replacement.len());
        out.push_str(&self.text[..start]);
        out.push_str(replacement);
        out.push_str(&self.text[end..]);
        out
    }
}
