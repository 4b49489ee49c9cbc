//! `IntLiteral`: an integer value plus the base its source used, so
//! printing can re-emit the same base the parser saw.

/// An integer literal that remembers whether it was written in decimal or
/// hex, so the pretty-printer can round-trip `0x2A` as `0x2a` rather than
/// `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntLiteral {
    pub value: i64,
    pub base: u32,
}

impl IntLiteral {
    /// Parse a literal as it appears in Smali source: an optional leading
    /// `-`, then either `0x`-prefixed hex digits or decimal digits.
    pub fn parse(literal: &str) -> Option<Self> {
        let (sign, unsigned) = match literal.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, literal),
        };
        let (base, digits) = if let Some(hex) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            (16, hex)
        } else {
            (10, unsigned)
        };
        let magnitude = i64::from_str_radix(digits, base).ok()?;
        Some(Self {
            value: sign * magnitude,
            base,
        })
    }
}

impl std::fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base == 16 {
            if self.value < 0 {
                write!(f, "-0x{:x}", -self.value)
            } else {
                write!(f, "0x{:x}", self.value)
            }
        } else {
            write!(f, "{}", self.value)
        }
    }
}
