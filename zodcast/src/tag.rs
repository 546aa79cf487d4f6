//! Struct tag parsing.
//!
//! Tags follow the conventional `key:"value" key2:"value2"` layout. Only the
//! `json` key matters to the converter; [`JsonTag`] extracts its name and
//! options.

use std::borrow::Cow;

/// A raw struct tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    /// Value stored under `key`, if present and well-formed.
    ///
    /// Parsing stops at the first malformed pair, so anything after it is
    /// invisible.
    pub fn lookup(&self, key: &str) -> Option<Cow<'a, str>> {
        let mut tag = self.0;
        while !tag.is_empty() {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                break;
            }

            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                break;
            }
            let name = &tag[..i];
            tag = &tag[i + 1..];

            let bytes = tag.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let quoted = &tag[1..i];
            tag = &tag[i + 1..];

            if name == key {
                return unquote(quoted);
            }
        }
        None
    }

    /// Value stored under `key`, or an empty string.
    pub fn get(&self, key: &str) -> Cow<'a, str> {
        self.lookup(key).unwrap_or(Cow::Borrowed(""))
    }
}

fn unquote(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('\\') {
        return Some(Cow::Borrowed(s));
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(Cow::Owned(out))
}

/// Parsed `json` tag of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonTag {
    /// Explicit serialized name, if the tag sets one.
    pub name: Option<String>,
    /// `omitempty` option.
    pub omit_empty: bool,
    /// `inline` option.
    pub inline: bool,
    /// The tag is exactly `-`.
    pub skip: bool,
}

impl JsonTag {
    /// Parse the value of a `json` tag, e.g. `name,omitempty`.
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            return Self {
                skip: true,
                ..Self::default()
            };
        }
        let mut parts = value.split(',');
        let name = parts
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let mut tag = Self {
            name,
            ..Self::default()
        };
        for option in parts {
            match option {
                "omitempty" => tag.omit_empty = true,
                "inline" => tag.inline = true,
                _ => {}
            }
        }
        tag
    }

    /// Parse the `json` entry of a raw struct tag.
    pub fn from_struct_tag(raw: &str) -> Self {
        Self::parse(&StructTag::new(raw).get("json"))
    }
}
