//! Scratch state behind the "new hero" form.

use std::str::FromStr;

use shared::protocol::CreateHeroRequest;
use thiserror::Error;

pub const DEFAULT_HUMILITY_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Superpower,
    HumilityScore,
}

#[derive(Debug, Error)]
#[error("unknown form field '{0}' (expected name, superpower or humilityScore)")]
pub struct UnknownDraftField(pub String);

impl FromStr for DraftField {
    type Err = UnknownDraftField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "superpower" => Ok(Self::Superpower),
            "humilityscore" | "humility_score" | "score" => Ok(Self::HumilityScore),
            _ => Err(UnknownDraftField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftForm {
    pub name: String,
    pub superpower: String,
    pub humility_score: f64,
}

impl Default for DraftForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            superpower: String::new(),
            humility_score: DEFAULT_HUMILITY_SCORE,
        }
    }
}

impl DraftForm {
    /// Replaces one field from raw widget text, leaving the others alone.
    pub fn apply(&mut self, field: DraftField, raw: &str) {
        match field {
            DraftField::Name => self.name = raw.to_string(),
            DraftField::Superpower => self.superpower = raw.to_string(),
            DraftField::HumilityScore => self.humility_score = parse_humility_score(raw),
        }
    }

    pub fn to_request(&self) -> CreateHeroRequest {
        CreateHeroRequest {
            name: self.name.clone(),
            superpower: self.superpower.clone(),
            humility_score: self.humility_score,
        }
    }
}

/// Parses score text the way a browser number input does: the longest
/// numeric prefix wins and anything unusable becomes `0`.
pub fn parse_humility_score(raw: &str) -> f64 {
    let parsed = numeric_prefix(raw.trim_start())
        .parse::<f64>()
        .unwrap_or(0.0);
    // NaN and -0 are both falsy and fall back to 0.
    if parsed.is_nan() || parsed == 0.0 {
        0.0
    } else {
        parsed
    }
}

fn numeric_prefix(s: &str) -> &str {
    const INFINITY: &str = "Infinity";

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with(INFINITY) {
        return &s[..end + INFINITY.len()];
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}
