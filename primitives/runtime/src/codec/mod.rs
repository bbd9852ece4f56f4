//! Request decoding and response encoding.
//!
//! A [`Decoder`] yields one request per call to [`Decoder::decode`] until its
//! input is exhausted; an [`Encoder`] writes one response per call to
//! [`Encoder::encode`]. Both are picked by a short format key through a
//! [`CodecRegistry`].

mod stream;

use std::collections::{BTreeMap, VecDeque};
use std::io::{BufRead, Read, Write};

pub use serde::de::DeserializeOwned;
pub use serde::Serialize;
pub use stream::{send_all, DecodeFailure, RequestStream, SendAll, Sent};

use serde::Deserialize;
use serde_json::ser::PrettyFormatter;

/// Source of request bytes.
pub type Input = Box<dyn BufRead + Send>;

/// Sink for response bytes.
pub type Output = Box<dyn Write + Send>;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Errors raised while decoding requests or encoding responses.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// No codec is registered for the requested key.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),

    /// Malformed JSON, or JSON that does not fit the message type.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML, or YAML that does not fit the message type.
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed XML, or XML that does not fit the message type.
    #[error("xml: {0}")]
    Xml(String),

    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Wire representation of a message on the terminal side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// One compact JSON value per line
    Json,
    /// Tab-indented JSON values
    PrettyJson,
    /// YAML documents separated by `---`
    Yaml,
    /// A single XML document
    Xml,
}

/// Maps format keys (`json`, `yaml`, ...) to formats.
///
/// Encoders are chosen by the `--response-format` value, decoders by the
/// request file's extension.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    encoders: BTreeMap<String, Format>,
    decoders: BTreeMap<String, Format>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self { encoders: BTreeMap::new(), decoders: BTreeMap::new() };
        registry.register_encoder("json", Format::Json);
        registry.register_encoder("prettyjson", Format::PrettyJson);
        registry.register_encoder("yaml", Format::Yaml);
        registry.register_encoder("xml", Format::Xml);
        registry.register_decoder("json", Format::Json);
        registry.register_decoder("yaml", Format::Yaml);
        registry.register_decoder("yml", Format::Yaml);
        registry.register_decoder("xml", Format::Xml);
        registry
    }
}

impl CodecRegistry {
    /// Registry with the built-in formats
    pub fn new() -> Self { Self::default() }

    /// Register (or replace) the encoder used for `key`.
    pub fn register_encoder(&mut self, key: &str, format: Format) {
        self.encoders.insert(key.to_ascii_lowercase(), format);
    }

    /// Register (or replace) the decoder used for `key`.
    pub fn register_decoder(&mut self, key: &str, format: Format) {
        self.decoders.insert(key.to_ascii_lowercase(), format);
    }

    /// Keys accepted by [`CodecRegistry::encoder`], sorted.
    pub fn encoder_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.encoders.keys().map(String::as_str)
    }

    /// Build an encoder writing to `output`.
    pub fn encoder(&self, key: &str, output: Output) -> Result<Encoder> {
        let format = self
            .encoders
            .get(&key.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| CodecError::UnknownFormat(key.to_string()))?;
        Ok(Encoder::new(format, output))
    }

    /// Build a decoder reading from `input`.
    pub fn decoder(&self, key: &str, input: Input) -> Result<Decoder> {
        let format = self
            .decoders
            .get(&key.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| CodecError::UnknownFormat(key.to_string()))?;
        Ok(Decoder::new(format, input))
    }
}

/// Writes messages one at a time in a fixed format.
pub struct Encoder {
    format: Format,
    output: Output,
    written: usize,
}

impl Encoder {
    /// Encoder for `format` writing to `output`
    pub fn new(format: Format, output: Output) -> Self { Self { format, output, written: 0 } }

    /// The format this encoder writes.
    pub fn format(&self) -> Format { self.format }

    /// Write one message and flush.
    pub fn encode<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<()> {
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut self.output, message)?;
                self.output.write_all(b"\n")?;
            }
            Format::PrettyJson => {
                let formatter = PrettyFormatter::with_indent(b"\t");
                let mut serializer =
                    serde_json::Serializer::with_formatter(&mut self.output, formatter);
                message.serialize(&mut serializer)?;
                self.output.write_all(b"\n")?;
            }
            Format::Yaml => {
                if self.written > 0 {
                    self.output.write_all(b"---\n")?;
                }
                serde_yaml::to_writer(&mut self.output, message)?;
            }
            Format::Xml => {
                let body = quick_xml::se::to_string(message).map_err(|e| CodecError::Xml(e.to_string()))?;
                writeln!(self.output, "{XML_HEADER}")?;
                self.output.write_all(body.as_bytes())?;
                self.output.write_all(b"\n")?;
            }
        }
        self.written += 1;
        self.output.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder").field("format", &self.format).field("written", &self.written).finish()
    }
}

enum DecoderState {
    Json(serde_json::StreamDeserializer<'static, serde_json::de::IoRead<Input>, serde_json::Value>),
    Yaml { input: Option<Input>, documents: VecDeque<serde_yaml::Value> },
    Xml { input: Option<Input> },
}

/// Reads messages one at a time in a fixed format.
pub struct Decoder {
    format: Format,
    state: DecoderState,
}

impl Decoder {
    /// Decoder for `format` reading from `input`
    pub fn new(format: Format, input: Input) -> Self {
        let state = match format {
            Format::Json | Format::PrettyJson => {
                DecoderState::Json(serde_json::Deserializer::from_reader(input).into_iter())
            }
            Format::Yaml => DecoderState::Yaml { input: Some(input), documents: VecDeque::new() },
            Format::Xml => DecoderState::Xml { input: Some(input) },
        };
        Self { format, state }
    }

    /// The format this decoder reads.
    pub fn format(&self) -> Format { self.format }

    /// Read the next message, or `None` once the input is exhausted.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match &mut self.state {
            DecoderState::Json(stream) => match stream.next() {
                Some(value) => Ok(Some(serde_json::from_value(value?)?)),
                None => Ok(None),
            },
            DecoderState::Yaml { input, documents } => {
                if let Some(mut reader) = input.take() {
                    let mut text = String::new();
                    reader.read_to_string(&mut text)?;
                    for document in serde_yaml::Deserializer::from_str(&text) {
                        let value = serde_yaml::Value::deserialize(document)?;
                        if !value.is_null() {
                            documents.push_back(value);
                        }
                    }
                }
                match documents.pop_front() {
                    Some(value) => Ok(Some(serde_yaml::from_value(value)?)),
                    None => Ok(None),
                }
            }
            DecoderState::Xml { input } => {
                let Some(mut reader) = input.take() else { return Ok(None) };
                let mut text = String::new();
                reader.read_to_string(&mut text)?;
                let body = strip_xml_declaration(&text);
                if body.trim().is_empty() {
                    return Ok(None);
                }
                quick_xml::de::from_str(body).map(Some).map_err(|e| CodecError::Xml(e.to_string()))
            }
        }
    }

    /// Read every remaining message, failing on the first one that does not
    /// decode.
    pub fn decode_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut messages = Vec::new();
        while let Some(message) = self.decode()? {
            messages.push(message);
        }
        Ok(messages)
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder").field("format", &self.format).finish_non_exhaustive()
    }
}

fn strip_xml_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keys_are_case_insensitive() {
        let registry = CodecRegistry::new();
        assert!(registry.encoder("JSON", Box::new(Vec::new())).is_ok());
        assert!(registry.decoder("Yml", Box::new(std::io::empty())).is_ok());
    }

    #[test]
    fn test_unknown_format() {
        let registry = CodecRegistry::new();
        let err = registry.encoder("toml", Box::new(Vec::new())).unwrap_err();
        assert!(matches!(err, CodecError::UnknownFormat(key) if key == "toml"));
        assert!(registry.decoder("prettyjson", Box::new(std::io::empty())).is_err());
    }

    #[test]
    fn test_encoder_keys_sorted() {
        let keys: Vec<_> = CodecRegistry::new().encoder_keys().map(str::to_string).collect();
        assert_eq!(keys, ["json", "prettyjson", "xml", "yaml"]);
    }

    #[test]
    fn test_strip_xml_declaration() {
        assert_eq!(strip_xml_declaration("<?xml version=\"1.0\"?>\n<a/>"), "\n<a/>");
        assert_eq!(strip_xml_declaration("  <a/>"), "<a/>");
    }
}
