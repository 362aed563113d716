use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input to a QR encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub foreground: String,
    pub background: String,
}

/// A rendered code ready for display or download.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCode {
    pub text: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub png: Vec<u8>,
    pub data_url: String,
    pub file_name: String,
}

/// Which polarities the decoder tries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InversionPolicy {
    /// Dark-on-light only.
    #[default]
    DontInvert,
    /// Light-on-dark only.
    OnlyInvert,
    /// Normal first, then inverted.
    AttemptBoth,
    /// Inverted first, then normal.
    InvertFirst,
}

impl InversionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InversionPolicy::DontInvert => "dontInvert",
            InversionPolicy::OnlyInvert => "onlyInvert",
            InversionPolicy::AttemptBoth => "attemptBoth",
            InversionPolicy::InvertFirst => "invertFirst",
        }
    }

    /// Polarities to try, in order. `true` means inverted.
    pub fn passes(&self) -> &'static [bool] {
        match self {
            InversionPolicy::DontInvert => &[false],
            InversionPolicy::OnlyInvert => &[true],
            InversionPolicy::AttemptBoth => &[false, true],
            InversionPolicy::InvertFirst => &[true, false],
        }
    }
}

impl fmt::Display for InversionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InversionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dontInvert" => Ok(InversionPolicy::DontInvert),
            "onlyInvert" => Ok(InversionPolicy::OnlyInvert),
            "attemptBoth" => Ok(InversionPolicy::AttemptBoth),
            "invertFirst" => Ok(InversionPolicy::InvertFirst),
            other => Err(format!("unknown inversion policy: {}", other)),
        }
    }
}

/// Raw RGBA pixels submitted to a decoder.
#[derive(Debug, Clone, Copy)]
pub struct DecodeRequest<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub inversion: InversionPolicy,
}
