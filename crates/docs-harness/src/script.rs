//! Writing-system detection for localization sanity checks.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A writing system whose presence can be detected in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Hiragana, katakana and kanji
    Japanese,
    /// CJK unified ideographs
    Chinese,
    /// Hangul syllables and jamo
    Korean,
    Cyrillic,
}

impl Script {
    /// Whether `c` belongs to this script.
    pub fn contains(self, c: char) -> bool {
        let cp = c as u32;
        match self {
            Script::Japanese => {
                is_hiragana(cp) || is_katakana(cp) || is_cjk_ideograph(cp) || cp == 0x3005
            }
            Script::Chinese => is_cjk_ideograph(cp),
            Script::Korean => matches!(
                cp,
                0x1100..=0x11FF | 0x3130..=0x318F | 0xA960..=0xA97F | 0xAC00..=0xD7AF | 0xD7B0..=0xD7FF
            ),
            Script::Cyrillic => {
                matches!(cp, 0x0400..=0x04FF | 0x0500..=0x052F | 0x2DE0..=0x2DFF | 0xA640..=0xA69F)
            }
        }
    }

    /// Whether at least one character of this script appears in `text`.
    pub fn present_in(self, text: &str) -> bool {
        text.chars().any(|c| self.contains(c))
    }

    pub fn name(self) -> &'static str {
        match self {
            Script::Japanese => "japanese",
            Script::Chinese => "chinese",
            Script::Korean => "korean",
            Script::Cyrillic => "cyrillic",
        }
    }
}

fn is_hiragana(cp: u32) -> bool {
    matches!(cp, 0x3040..=0x309F)
}

// Full-width block plus the half-width forms.
fn is_katakana(cp: u32) -> bool {
    matches!(cp, 0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F)
}

// Unified ideographs, extensions A through G, and both compatibility blocks.
fn is_cjk_ideograph(cp: u32) -> bool {
    matches!(
        cp,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
            | 0x30000..=0x3134F
            | 0xF900..=0xFAFF
            | 0x2F800..=0x2FA1F
    )
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts script names and the locale codes whose text is written in them.
impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "japanese" | "ja" => Ok(Script::Japanese),
            "chinese" | "cn" | "zh" => Ok(Script::Chinese),
            "korean" | "ko" => Ok(Script::Korean),
            "cyrillic" | "ru" => Ok(Script::Cyrillic),
            other => Err(Error::Config(format!("unknown script: {other}"))),
        }
    }
}
