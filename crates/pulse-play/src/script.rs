use std::str::FromStr;

/// A register write given on the command line as `ADDR=VALUE` in hex,
/// e.g. `4000=bf` or `$4003=$08`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterWrite {
    pub addr: u16,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWriteError {
    MissingSeparator(String),
    BadAddress(String),
    BadValue(String),
}

impl std::error::Error for ParseWriteError {}

impl std::fmt::Display for ParseWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWriteError::MissingSeparator(s) => write!(f, "expected ADDR=VALUE, got '{s}'"),
            ParseWriteError::BadAddress(s) => write!(f, "invalid register address '{s}'"),
            ParseWriteError::BadValue(s) => write!(f, "invalid register value '{s}'"),
        }
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s)
}

impl FromStr for RegisterWrite {
    type Err = ParseWriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((addr, value)) = s.split_once('=') else {
            return Err(ParseWriteError::MissingSeparator(s.to_string()));
        };

        let addr = u16::from_str_radix(strip_hex_prefix(addr), 16)
            .map_err(|_| ParseWriteError::BadAddress(addr.to_string()))?;
        let value = u8::from_str_radix(strip_hex_prefix(value), 16)
            .map_err(|_| ParseWriteError::BadValue(value.to_string()))?;

        Ok(RegisterWrite { addr, value })
    }
}
