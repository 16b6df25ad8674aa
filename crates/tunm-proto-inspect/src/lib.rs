//! Envelope inspection for tooling and debugging.
//!
//! Decodes one message and renders it as JSON, naming every value by its
//! registry type name so wire-level detail (varint collapse, float scaling)
//! stays visible.

use std::path::PathBuf;

use base64::Engine;
use serde::Serialize;
use serde_json::{json, Value as Json};

use tunm_proto_core::{tag_to_name, Buffer, Codec, ProtoError, Result, Value};

/// Decode one tunm proto envelope and print it as JSON.
#[derive(Debug, clap::Parser)]
#[command(name = "tunm-proto-inspect")]
pub struct Cli {
    /// File holding one encoded envelope.
    pub path: PathBuf,
    /// How the file's bytes are written.
    #[arg(long, value_enum, default_value_t = InputEncoding::Raw)]
    pub encoding: InputEncoding,
    /// Codec config (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// How the input bytes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputEncoding {
    Raw,
    Hex,
    Base64,
}

impl InputEncoding {
    pub fn decode(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            InputEncoding::Raw => Ok(input.to_vec()),
            InputEncoding::Hex => {
                let text: String = String::from_utf8_lossy(input)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                hex::decode(text).map_err(|e| ProtoError::Io(format!("invalid hex input: {e}")))
            }
            InputEncoding::Base64 => {
                let text: String = String::from_utf8_lossy(input)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                base64::engine::general_purpose::STANDARD
                    .decode(text)
                    .map_err(|e| ProtoError::Io(format!("invalid base64 input: {e}")))
            }
        }
    }
}

/// Decoded envelope, ready to print.
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub strs: Vec<String>,
    pub body: Json,
    pub consumed: usize,
    pub trailing: usize,
}

/// Render a value as `{"type": <name>, "value": <payload>}`.
///
/// Maps become a list of `[key, value]` pairs since keys need not be strings.
pub fn render(value: &Value) -> Json {
    let payload = match value {
        Value::Nil => Json::Null,
        Value::Bool(b) => json!(b),
        Value::U8(_)
        | Value::I8(_)
        | Value::U16(_)
        | Value::I16(_)
        | Value::U32(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::Varint(_) => json!(value.get_num()),
        Value::U64(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::Str(s) => json!(s),
        Value::Raw(data) => json!(hex::encode(data)),
        Value::Arr(items) => Json::Array(items.iter().map(render).collect()),
        Value::Map(map) => Json::Array(
            map.iter()
                .map(|(k, v)| Json::Array(vec![render(k), render(v)]))
                .collect(),
        ),
    };
    json!({ "type": tag_to_name(value.tag().as_u8()), "value": payload })
}

/// Decode one envelope from `bytes`.
pub fn inspect(codec: &Codec, bytes: &[u8]) -> Result<Report> {
    let mut buffer = Buffer::from(bytes);
    let (name, body) = codec.decode_proto(&mut buffer)?;
    Ok(Report {
        name,
        strs: buffer.str_table().to_vec(),
        body: render(&body),
        consumed: buffer.read_pos(),
        trailing: buffer.data_len(),
    })
}
