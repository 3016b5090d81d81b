//! `{Name}` substitution in the style of Python's `str.format`, which is the
//! syntax the configuration templates are written in.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{LayoutError, Result};

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::(?P<spec>[^{}]*))?\}|[{}]").unwrap()
});

/// Replaces every `{Name}` in `template` by the matching parameter.
/// `{{`/`}}` are literal braces. A `:spec` suffix supports the
/// `[[fill]align][0][width][d|s]` subset; anything else is an error.
pub fn format_template(template: &str, params: &Map<String, Value>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match (whole.as_str(), caps.name("name")) {
            ("{{", _) => out.push('{'),
            ("}}", _) => out.push('}'),
            (_, Some(name)) => {
                let value = params
                    .get(name.as_str())
                    .ok_or_else(|| LayoutError::MissingParameter {
                        name: name.as_str().to_string(),
                    })?;
                match caps.name("spec") {
                    Some(spec) => {
                        let spec = FormatSpec::parse(spec.as_str())?;
                        out.push_str(&spec.apply(name.as_str(), value)?);
                    }
                    None => push_value(&mut out, value),
                }
            }
            (brace, None) => {
                return Err(LayoutError::Template {
                    message: format!("single '{brace}' at offset {}", whole.start()),
                });
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

/// Fill, alignment and minimum width of one placeholder.
#[derive(Debug, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Option<char>,
    zero: bool,
    width: usize,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let is_align = |c: &char| matches!(c, '<' | '>' | '^');
        let (fill, align, mut rest) = match chars.as_slice() {
            [fill, align, rest @ ..] if is_align(align) => (*fill, Some(*align), rest),
            [align, rest @ ..] if is_align(align) => (' ', Some(*align), rest),
            rest => (' ', None, rest),
        };

        let zero = rest.first() == Some(&'0');
        if zero {
            rest = &rest[1..];
        }
        let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        let width = match digits {
            0 => 0,
            _ => rest[..digits]
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| unsupported_spec(spec))?,
        };
        let kind = match &rest[digits..] {
            [] => None,
            [kind @ ('d' | 's')] => Some(*kind),
            _ => return Err(unsupported_spec(spec)),
        };

        Ok(Self {
            fill,
            align,
            zero,
            width,
            kind,
        })
    }

    fn apply(&self, name: &str, value: &Value) -> Result<String> {
        let numeric = value.is_number();
        match (self.kind, value) {
            (Some('d'), Value::Number(n)) if n.is_i64() || n.is_u64() => {}
            (Some('s'), Value::String(_)) | (None, _) => {}
            (Some(kind), _) => {
                return Err(LayoutError::Template {
                    message: format!("format code '{kind}' does not fit parameter `{name}` = {value}"),
                });
            }
        }

        let mut text = String::new();
        push_value(&mut text, value);
        let len = text.chars().count();
        if len >= self.width {
            return Ok(text);
        }
        let gap = self.width - len;

        if self.align.is_none() && self.zero && numeric {
            let (sign, digits) = match text.strip_prefix('-') {
                Some(digits) => ("-", digits),
                None => ("", text.as_str()),
            };
            return Ok(format!("{sign}{}{digits}", "0".repeat(gap)));
        }

        let fill = if self.align.is_none() && self.zero {
            '0'
        } else {
            self.fill
        };
        let padding = |n: usize| std::iter::repeat_n(fill, n).collect::<String>();
        let align = self.align.unwrap_or(if numeric { '>' } else { '<' });
        Ok(match align {
            '<' => text + &padding(gap),
            '>' => padding(gap) + &text,
            _ => padding(gap / 2) + &text + &padding(gap - gap / 2),
        })
    }
}

fn unsupported_spec(spec: &str) -> LayoutError {
    LayoutError::Template {
        message: format!("unsupported format spec ':{spec}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test params are objects"),
        }
    }

    #[test]
    fn substitutes_named_fields() {
        let p = params(json!({"Left": 15, "Name": "Ada", "Boss": null, "Flag": true}));
        let out = format_template("<rect x=\"{Left}\"/>{Name} {Boss} {Flag}", &p).unwrap();
        assert_eq!(out, "<rect x=\"15\"/>Ada None True");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let p = params(json!({"W": 3}));
        let out = format_template(".a {{ width: {W}px }}", &p).unwrap();
        assert_eq!(out, ".a { width: 3px }");
    }

    #[test]
    fn format_spec_pads_and_aligns() {
        let p = params(json!({"x": 4, "n": -4, "Name": "Ada"}));
        assert_eq!(format_template("[{x:>5}]", &p).unwrap(), "[    4]");
        assert_eq!(format_template("[{x:5}]", &p).unwrap(), "[    4]");
        assert_eq!(format_template("[{Name:5}]", &p).unwrap(), "[Ada  ]");
        assert_eq!(format_template("[{Name:*^7}]", &p).unwrap(), "[**Ada**]");
        assert_eq!(format_template("[{Name:^6}]", &p).unwrap(), "[ Ada  ]");
        assert_eq!(format_template("[{x:<3d}]", &p).unwrap(), "[4  ]");
        assert_eq!(format_template("[{n:05}]", &p).unwrap(), "[-0004]");
        assert_eq!(format_template("[{Name:2s}]", &p).unwrap(), "[Ada]");
        assert_eq!(format_template("[{x:}]", &p).unwrap(), "[4]");
    }

    #[test]
    fn unsupported_format_spec_is_an_error() {
        let p = params(json!({"x": 4.5, "Name": "Ada"}));
        for template in ["{x:.2f}", "{x:+}", "{x:,}", "{Name:d}", "{x:d}", "{x:=5}"] {
            assert!(
                matches!(format_template(template, &p), Err(LayoutError::Template { .. })),
                "{template} should be rejected"
            );
        }
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let err = format_template("{Nope}", &Map::new()).unwrap_err();
        assert!(matches!(err, LayoutError::MissingParameter { ref name } if name == "Nope"));
    }

    #[test]
    fn stray_braces_are_rejected() {
        assert!(matches!(
            format_template("a { b", &Map::new()),
            Err(LayoutError::Template { .. })
        ));
        assert!(matches!(
            format_template("a } b", &Map::new()),
            Err(LayoutError::Template { .. })
        ));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(format_template("</svg>", &Map::new()).unwrap(), "</svg>");
    }
}
