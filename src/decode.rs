//! Upload decoding: turns the bytes of an exported city (`.cit`, `.citb`) or
//! save (`.sod`, `.sodb`) file into a JSON document.

use std::io::Read;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CitySearchError, Result};

lazy_static! {
    // the game occasionally writes NaN, which is not JSON
    static ref BARE_NAN: Regex = Regex::new(r"\bNaN\b").expect("valid NaN pattern");
}

// trailing bytes the game appends after the brotli stream of a .citb
const CITB_TRAILER: usize = 4;
const BROTLI_BUFFER: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    City,
    CompressedCity,
    Save,
    CompressedSave,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "cit" => Some(Self::City),
            "citb" => Some(Self::CompressedCity),
            "sod" => Some(Self::Save),
            "sodb" => Some(Self::CompressedSave),
            _ => None,
        }
    }
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::CompressedCity | Self::CompressedSave)
    }
}

/// The lowercase text after the last dot, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn decode(bytes: &[u8], extension: &str) -> Result<Value> {
    let kind = FileKind::from_extension(extension)
        .ok_or_else(|| CitySearchError::decode("Invalid file type"))?;
    debug!(?kind, bytes = bytes.len(), "decoding upload");
    match kind {
        FileKind::City | FileKind::Save => parse_text(bytes, "Invalid JSON file"),
        FileKind::CompressedCity => {
            if bytes.len() < CITB_TRAILER {
                return Err(CitySearchError::decode("File too short"));
            }
            let inflated = inflate(&bytes[..bytes.len() - CITB_TRAILER])?;
            parse_text(&inflated, "Invalid JSON after decompression")
        }
        FileKind::CompressedSave => {
            let inflated = inflate(bytes)?;
            parse_text(&inflated, "Invalid JSON after decompression")
        }
    }
}

/// Convenience over [`decode`] taking the uploaded file's name.
pub fn decode_file(bytes: &[u8], file_name: &str) -> Result<Value> {
    decode(bytes, &extension_of(file_name))
}

/// Hex blake3 digest of the uploaded bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut inflated = Vec::new();
    brotli::Decompressor::new(compressed, BROTLI_BUFFER)
        .read_to_end(&mut inflated)
        .map_err(|e| {
            warn!(error = %e, "brotli decompression failed");
            CitySearchError::decode(e.to_string())
        })?;
    Ok(inflated)
}

fn parse_text(bytes: &[u8], invalid: &str) -> Result<Value> {
    // invalid sequences become U+FFFD rather than failing the upload
    let text = String::from_utf8_lossy(bytes);
    let text = text.as_ref();
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first) => {
            if !BARE_NAN.is_match(text) {
                warn!(error = %first, "upload is not valid JSON");
                return Err(CitySearchError::decode(invalid));
            }
            let cleaned = BARE_NAN.replace_all(text, "null");
            serde_json::from_str(&cleaned).map_err(|e| {
                warn!(error = %e, "upload is not valid JSON after NaN cleanup");
                CitySearchError::decode(invalid)
            })
        }
    }
}
