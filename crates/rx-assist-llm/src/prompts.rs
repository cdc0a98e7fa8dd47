//! Chat prompts for prescription question answering.
//!
//! The prescription goes to the model as a small JSON document so that OCR
//! noise stays visibly separated from the user's question.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

/// Persona and task line that opens every prompt.
pub const PERSONA: &str =
    "You are an AI pharmacist assistant. Analyze the following prescription provided as JSON:";

/// Lead-in for the user's question.
pub const QUESTION_LEAD: &str = "Answer the user's question clearly and concisely:";

/// JSON payload wrapping the OCR text.
#[derive(Debug, Serialize)]
struct PrescriptionPayload<'a> {
    prescription: &'a str,
}

/// Pretty formatter that writes non-ASCII characters as `\uXXXX` escapes
/// (UTF-16 surrogate pairs above the BMP).
struct AsciiPrettyFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn with_indent(indent: &'a [u8]) -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(indent),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            for unit in c.encode_utf16(&mut [0u16; 2]).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// `{"prescription": <text>}` pretty-printed with 4-space indentation, ASCII only.
pub fn prescription_payload_json(prescription: &str) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = AsciiPrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    PrescriptionPayload { prescription }.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Full prompt for one question about one prescription.
pub fn make_chat_prompt(prescription: &str, question: &str) -> Result<String, serde_json::Error> {
    let payload = prescription_payload_json(prescription)?;
    Ok(format!("{PERSONA}\n{payload}\n\n{QUESTION_LEAD} {question}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_payload_indentation() {
        let json = prescription_payload_json("Paracetamol 500mg").unwrap();
        assert_eq!(json, "{\n    \"prescription\": \"Paracetamol 500mg\"\n}");
    }

    #[test]
    fn test_payload_escapes_newlines_and_quotes() {
        let json = prescription_payload_json("Tab \"Dolo\"\n1-0-1").unwrap();
        assert!(json.contains(r#""Tab \"Dolo\"\n1-0-1""#));
    }

    #[test]
    fn test_payload_escapes_non_ascii() {
        let json = prescription_payload_json("Crocin ₹30 × 2 💊").unwrap();

        assert!(json.is_ascii());
        assert!(json.contains(r#""Crocin \u20b930 \u00d7 2 \ud83d\udc8a""#));
    }

    #[test]
    fn test_chat_prompt_layout() {
        let prompt = make_chat_prompt("Paracetamol 500mg", "How often should I take it?").unwrap();
        let expected = "You are an AI pharmacist assistant. Analyze the following prescription provided as JSON:\n\
                        {\n    \"prescription\": \"Paracetamol 500mg\"\n}\n\n\
                        Answer the user's question clearly and concisely: How often should I take it?";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_chat_prompt_empty_prescription() {
        let prompt = make_chat_prompt("", "Anything?").unwrap();
        assert!(prompt.contains("\"prescription\": \"\""));
    }

    proptest! {
        #[test]
        fn payload_round_trips(text in ".*") {
            let json = prescription_payload_json(&text).unwrap();
            prop_assert!(json.is_ascii());
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed["prescription"].as_str(), Some(text.as_str()));
        }

        #[test]
        fn prompt_ends_with_question(question in "[a-zA-Z0-9 ?]{1,40}") {
            let prompt = make_chat_prompt("Ibuprofen 400mg", &question).unwrap();
            prop_assert!(prompt.starts_with(PERSONA));
            prop_assert!(prompt.ends_with(&question));
        }
    }
}
