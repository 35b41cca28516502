//! XML to [`Value`] decoding.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FogbugzError, Result};
use crate::value::{Value, CONTENT_KEY};

/// Decode a FogBugz response document.
///
/// Returns the content of the root element (FogBugz wraps every reply in
/// `<response>`), decoded with these rules:
///
/// - text-only elements become [`Value::String`], empty ones [`Value::Null`];
/// - `type="integer"`, `"float"` or `"decimal"` on a text-only element yields
///   [`Value::Number`];
/// - elements with attributes or children become [`Value::Mapping`], with
///   repeated children collected into a [`Value::Sequence`] and stray text
///   kept under [`CONTENT_KEY`].
///
/// # Errors
///
/// Returns [`FogbugzError::Parse`] for malformed or empty documents.
pub fn parse_response(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Element::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push((name, value)),
                    None => return Ok(value),
                }
            }
            Event::End(_) => {
                let (name, value) = stack
                    .pop()
                    .ok_or_else(|| FogbugzError::Parse("unbalanced end tag".to_string()))?
                    .close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push((name, value)),
                    None => return Ok(value),
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(top) = stack.last_mut() {
                    let raw = cdata.into_inner();
                    let text = std::str::from_utf8(&raw)
                        .map_err(|e| FogbugzError::Parse(e.to_string()))?;
                    top.text.push_str(text);
                }
            }
            Event::Eof => {
                let msg = if stack.is_empty() {
                    "empty document"
                } else {
                    "unexpected end of document"
                };
                return Err(FogbugzError::Parse(msg.to_string()));
            }
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }
}

/// An element whose end tag has not been seen yet.
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Value)>,
    text: String,
    numeric: bool,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        let mut numeric = false;

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            if key == "type" && matches!(value.as_str(), "integer" | "float" | "decimal") {
                numeric = true;
                continue;
            }
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
            numeric,
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();

        if self.attributes.is_empty() && self.children.is_empty() {
            let value = if text.is_empty() {
                Value::Null
            } else if self.numeric {
                text.parse::<f64>()
                    .map_or_else(|_| Value::from(text), Value::Number)
            } else {
                Value::from(text)
            };
            return (self.name, value);
        }

        let mut map = BTreeMap::new();
        for (key, value) in self.attributes {
            insert_merged(&mut map, key, Value::String(value));
        }
        for (key, value) in self.children {
            insert_merged(&mut map, key, value);
        }
        if !text.is_empty() {
            insert_merged(&mut map, CONTENT_KEY.to_string(), Value::from(text));
        }

        (self.name, Value::Mapping(map))
    }
}

/// Insert `value` under `key`, turning repeated keys into a sequence.
fn insert_merged(map: &mut BTreeMap<String, Value>, key: String, value: Value) {
    match map.remove(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Value::Sequence(mut items)) => {
            items.push(value);
            map.insert(key, Value::Sequence(items));
        }
        Some(existing) => {
            map.insert(key, Value::Sequence(vec![existing, value]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_root_element() {
        let tree = parse_response(
            r#"<?xml version="1.0" encoding="UTF-8"?><response><token>abc123</token></response>"#,
        )
        .unwrap();
        assert_eq!(tree["token"].as_str(), Some("abc123"));
    }

    #[test]
    fn test_cdata_text() {
        let tree = parse_response(
            "<response><case><sTitle><![CDATA[Crash on <save>]]></sTitle></case></response>",
        )
        .unwrap();
        assert_eq!(tree["case"]["sTitle"].as_str(), Some("Crash on <save>"));
    }

    #[test]
    fn test_repeated_children_become_sequence() {
        let tree = parse_response(
            r#"<response><cases count="2">
                 <case ixBug="1"><sTitle>One</sTitle></case>
                 <case ixBug="2"><sTitle>Two</sTitle></case>
               </cases></response>"#,
        )
        .unwrap();

        let cases = tree["cases"]["case"].as_sequence();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0]["ixBug"].as_i64(), Some(1));
        assert_eq!(cases[1]["sTitle"].as_str(), Some("Two"));
        assert_eq!(tree["cases"]["count"].as_str(), Some("2"));
    }

    #[test]
    fn test_attributes_with_text_keep_content() {
        let tree =
            parse_response(r#"<response><error code="1">Incorrect password</error></response>"#)
                .unwrap();
        assert_eq!(tree["error"]["code"].as_str(), Some("1"));
        assert_eq!(tree["error"][CONTENT_KEY].as_str(), Some("Incorrect password"));
    }

    #[test]
    fn test_typed_numbers() {
        let tree = parse_response(
            r#"<response><hrsElapsed type="float">1.5</hrsElapsed><ixBug type="integer">12</ixBug><raw type="integer">n/a</raw></response>"#,
        )
        .unwrap();
        assert_eq!(tree["hrsElapsed"], Value::Number(1.5));
        assert_eq!(tree["ixBug"], Value::Number(12.0));
        assert_eq!(tree["raw"].as_str(), Some("n/a"));
    }

    #[test]
    fn test_empty_elements_are_null() {
        let tree = parse_response("<response><sEmail/><sPhone></sPhone></response>").unwrap();
        assert!(tree["sEmail"].is_null());
        assert!(tree["sPhone"].is_null());
        assert!(tree.get("sEmail").is_some());
    }

    #[test]
    fn test_escaped_text() {
        let tree = parse_response("<response><q>a &amp; b</q></response>").unwrap();
        assert_eq!(tree["q"].as_str(), Some("a & b"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse_response(""), Err(FogbugzError::Parse(_))));
        assert!(matches!(
            parse_response("<response><token>abc</response>"),
            Err(FogbugzError::Parse(_))
        ));
        assert!(matches!(
            parse_response("<response><token>abc</token>"),
            Err(FogbugzError::Parse(_))
        ));
    }
}
