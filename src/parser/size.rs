use nom::{
    character::complete::{alpha0, char, digit1, space0},
    IResult,
};

use crate::error::ConfigError;

/// A size literal split into its numeric parts and unit suffix
#[derive(Debug, Clone, PartialEq, Eq)]
struct SizeLiteral<'a> {
    whole: &'a str,
    fraction: Option<&'a str>,
    unit: &'a str,
}

/// Parse the fractional part of a number: `.5`
fn fraction(input: &str) -> IResult<&str, &str> {
    let (input, _) = char('.')(input)?;
    digit1(input)
}

/// Parse `<digits>[.<digits>] [unit]`
fn size_literal(input: &str) -> IResult<&str, SizeLiteral<'_>> {
    let (input, whole) = digit1(input)?;
    let (input, fraction) = match fraction(input) {
        Ok((rest, digits)) => (rest, Some(digits)),
        Err(_) => (input, None),
    };
    let (input, _) = space0(input)?;
    let (input, unit) = alpha0(input)?;

    Ok((
        input,
        SizeLiteral {
            whole,
            fraction,
            unit,
        },
    ))
}

/// Multiplier for a unit suffix. Bare letters are binary (`M` = MiB),
/// `KB`/`MB`/`GB` are decimal.
fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit.to_ascii_uppercase().as_str() {
        "" | "B" => Some(1),
        "K" | "KIB" => Some(1 << 10),
        "M" | "MIB" => Some(1 << 20),
        "G" | "GIB" => Some(1 << 30),
        "KB" => Some(1_000),
        "MB" => Some(1_000_000),
        "GB" => Some(1_000_000_000),
        _ => None,
    }
}

/// Parse a human-readable byte size such as `25MiB`, `25 MB`, `1.5G` or `1048576`
pub fn parse_size(spec: &str) -> Result<u64, ConfigError> {
    let invalid = || ConfigError::InvalidSize(spec.to_string());

    let (rest, literal) = size_literal(spec.trim()).map_err(|_| invalid())?;
    if !rest.is_empty() {
        return Err(invalid());
    }

    let multiplier = unit_multiplier(literal.unit).ok_or_else(invalid)?;

    match literal.fraction {
        None => {
            let whole: u64 = literal.whole.parse().map_err(|_| invalid())?;
            whole.checked_mul(multiplier).ok_or_else(invalid)
        }
        Some(fraction) => {
            let value: f64 = format!("{}.{}", literal.whole, fraction)
                .parse()
                .map_err(|_| invalid())?;
            let bytes = (value * multiplier as f64).round();
            if !bytes.is_finite() || bytes > u64::MAX as f64 {
                return Err(invalid());
            }
            Ok(bytes as u64)
        }
    }
}

/// clap value parser for target sizes
pub fn parse_target_size(spec: &str) -> Result<u64, String> {
    match parse_size(spec) {
        Ok(0) => Err(ConfigError::ZeroTarget.to_string()),
        Ok(bytes) => Ok(bytes),
        Err(e) => Err(e.to_string()),
    }
}
