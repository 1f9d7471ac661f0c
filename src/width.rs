use crate::adder::{AddTrace, add_words, trace_add};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed integer width selected at runtime (CLI flag or config value).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WidthRepr", into = "u32")]
pub enum Width {
    W8,
    W16,
    #[default]
    W32,
    W64,
}

/// Accepts both `width = 32` and `width = "i32"` in TOML.
#[derive(Deserialize)]
#[serde(untagged)]
enum WidthRepr {
    Bits(u32),
    Name(String),
}

impl TryFrom<WidthRepr> for Width {
    type Error = Error;

    fn try_from(repr: WidthRepr) -> Result<Self> {
        match repr {
            WidthRepr::Bits(bits) => Self::from_bits(bits),
            WidthRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Width> for u32 {
    fn from(w: Width) -> u32 {
        w.bits()
    }
}

impl Width {
    pub const ALL: [Width; 4] = [Width::W8, Width::W16, Width::W32, Width::W64];

    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(Self::W8),
            16 => Ok(Self::W16),
            32 => Ok(Self::W32),
            64 => Ok(Self::W64),
            other => Err(Error::parse(format!(
                "unsupported width {other} (expected 8, 16, 32 or 64)"
            ))),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    pub fn min(self) -> i64 {
        match self {
            Self::W8 => i8::MIN.into(),
            Self::W16 => i16::MIN.into(),
            Self::W32 => i32::MIN.into(),
            Self::W64 => i64::MIN,
        }
    }

    pub fn max(self) -> i64 {
        match self {
            Self::W8 => i8::MAX.into(),
            Self::W16 => i16::MAX.into(),
            Self::W32 => i32::MAX.into(),
            Self::W64 => i64::MAX,
        }
    }

    pub fn contains(self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Low `bits()` bits of `value`, for binary display.
    pub fn mask(self, value: i64) -> u64 {
        match self {
            Self::W64 => value as u64,
            w => (value as u64) & ((1u64 << w.bits()) - 1),
        }
    }

    fn check(self, value: i64) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(Error::out_of_range(value, self.bits()))
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for Width {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('i')
            .or_else(|| trimmed.strip_prefix('I'))
            .unwrap_or(trimmed);
        let bits: u32 = digits
            .parse()
            .map_err(|_| Error::parse(format!("invalid width '{s}'")))?;
        Self::from_bits(bits)
    }
}

/// Add two operands at the given width. Operands must fit the width; the sum wraps.
pub fn add_at_width(a: i64, b: i64, width: Width) -> Result<i64> {
    width.check(a)?;
    width.check(b)?;
    // Range checked above, so the narrowing casts are exact.
    let sum = match width {
        Width::W8 => add_words(a as i8, b as i8).into(),
        Width::W16 => add_words(a as i16, b as i16).into(),
        Width::W32 => add_words(a as i32, b as i32).into(),
        Width::W64 => add_words(a, b),
    };
    Ok(sum)
}

/// Like [`add_at_width`] but keeps every carry round, widened to `i64`.
pub fn trace_at_width(a: i64, b: i64, width: Width) -> Result<AddTrace<i64>> {
    width.check(a)?;
    width.check(b)?;
    let trace = match width {
        Width::W8 => trace_add(a as i8, b as i8).widen(),
        Width::W16 => trace_add(a as i16, b as i16).widen(),
        Width::W32 => trace_add(a as i32, b as i32).widen(),
        Width::W64 => trace_add(a, b),
    };
    Ok(trace)
}
