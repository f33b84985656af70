//! Minimal RFC 5322 header block reader.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ENCODED_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=\?([^?\s]+)\?([bBqQ])\?([^?\s]*)\?=").expect("valid regex")
});

/// Header fields of a message, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Parse the header block at the start of `raw`.
    ///
    /// Stops at the first empty line. Continuation lines are unfolded and encoded
    /// words are decoded. Lines without a colon are ignored.
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let mut fields: Vec<(String, String)> = Vec::new();

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }

            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = fields.last_mut() {
                    value.push_str(line);
                }
                continue;
            }

            if let Some((name, value)) = line.split_once(':') {
                fields.push((name.trim().to_string(), value.trim_start().to_string()));
            }
        }

        for (_, value) in &mut fields {
            if value.contains("=?") {
                let decoded = decode_encoded_words(value).into_owned();
                *value = decoded;
            }
        }

        Self { fields }
    }

    /// First value of `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decode RFC 2047 encoded words; whitespace between two encoded words is dropped.
pub fn decode_encoded_words(value: &str) -> Cow<'_, str> {
    if !value.contains("=?") {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut last_end = 0;
    let mut previous_was_encoded = false;

    for caps in ENCODED_WORD.captures_iter(value) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let between = &value[last_end..whole.start()];

        let Some(decoded) = decode_word(&caps[1], &caps[2], &caps[3]) else {
            out.push_str(&value[last_end..whole.end()]);
            last_end = whole.end();
            previous_was_encoded = false;
            continue;
        };

        if !(previous_was_encoded && between.trim().is_empty()) {
            out.push_str(between);
        }
        out.push_str(&decoded);
        last_end = whole.end();
        previous_was_encoded = true;
    }

    out.push_str(&value[last_end..]);
    Cow::Owned(out)
}

fn decode_word(charset: &str, encoding: &str, text: &str) -> Option<String> {
    let bytes = if encoding.eq_ignore_ascii_case("b") {
        STANDARD.decode(text).ok()?
    } else {
        decode_q(text)
    };

    // RFC 2231 language suffix, e.g. `utf-8*en`
    let charset = charset.split('*').next().unwrap_or(charset).to_ascii_lowercase();
    let decoded = match charset.as_str() {
        "iso-8859-1" | "latin1" | "latin-1" => bytes.iter().map(|&b| char::from(b)).collect(),
        _ => String::from_utf8_lossy(&bytes).into_owned(),
    };
    Some(decoded)
}

fn decode_q(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'=');
            },
            b => out.push(b),
        }
        i += 1;
    }

    out
}
