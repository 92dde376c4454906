use num_bigint::BigUint;
use num_traits::Zero;

use super::{suffix::power_of_thousand, Magnitude, NumberError, SuffixTable};

/// Decimal digits after the point in encoded output. Never trimmed.
pub const DISPLAY_DECIMALS: usize = 3;

/// Unsigned decimal held exactly as `digits / 10^fraction_digits`.
#[derive(Debug)]
struct ExactDecimal {
    digits: BigUint,
    fraction_digits: u32,
}

impl ExactDecimal {
    fn parse(text: &str) -> Result<Self, NumberError> {
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || !all_digits(whole)
            || !all_digits(fraction)
        {
            return Err(NumberError::Format(text.to_string()));
        }

        let joined = format!("{}{}", whole, fraction);
        let digits = BigUint::parse_bytes(joined.as_bytes(), 10)
            .ok_or_else(|| NumberError::Format(text.to_string()))?;
        let fraction_digits = u32::try_from(fraction.len())
            .map_err(|_| NumberError::Format(text.to_string()))?;

        Ok(Self {
            digits,
            fraction_digits,
        })
    }

    fn denominator(&self) -> BigUint {
        BigUint::from(10u32).pow(self.fraction_digits)
    }

    /// `self × multiplier`, rounded half away from zero.
    fn scale_rounded(&self, multiplier: &BigUint) -> BigUint {
        divide_rounded(&(&self.digits * multiplier), &self.denominator())
    }

    fn truncated(&self) -> BigUint {
        &self.digits / self.denominator()
    }
}

/// `numerator / denominator` rounded half away from zero (operands are unsigned).
fn divide_rounded(numerator: &BigUint, denominator: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    (numerator * &two + denominator) / (denominator * two)
}

/// Parses suffixed magnitude text with the standard suffix table.
///
/// Accepts `"86.035Q"`, `"1000000"`, `"12.5%"`. A trailing `%` is ignored.
/// Suffixed values are rounded to the nearest integer, plain decimals are
/// truncated.
pub fn decode(text: &str) -> Result<Magnitude, NumberError> {
    decode_with(SuffixTable::standard(), text)
}

pub fn decode_with(table: &SuffixTable, text: &str) -> Result<Magnitude, NumberError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

    if trimmed.is_empty() {
        return Err(NumberError::Format(text.to_string()));
    }

    let value = match table.split_suffix(trimmed) {
        Some((prefix, suffix)) => ExactDecimal::parse(prefix)
            .map_err(|_| NumberError::Format(text.to_string()))?
            .scale_rounded(suffix.threshold()),
        None => ExactDecimal::parse(trimmed)
            .map_err(|_| NumberError::Format(text.to_string()))?
            .truncated(),
    };

    Ok(Magnitude::new(value))
}

/// Formats a magnitude in the shortest suffix form with three decimals.
///
/// `0 → "0"`, `999 → "999"`, `1000 → "1.000K"`, `1234567 → "1.235M"`.
/// Values past the largest suffix keep that suffix with a numeric part of
/// 1000 or more.
pub fn encode(magnitude: &Magnitude) -> String {
    encode_with(SuffixTable::standard(), magnitude)
}

pub fn encode_with(table: &SuffixTable, magnitude: &Magnitude) -> String {
    let value = magnitude.as_biguint();
    let Some(mut index) = table.floor_index(value) else {
        return value.to_string();
    };

    let scale = power_of_thousand(1);
    let scaled_value = value * &scale;
    loop {
        let suffix = &table.entries()[index];
        let thousandths = divide_rounded(&scaled_value, suffix.threshold());

        // 999.9995K rounds to 1000.000K; write it as 1.000M instead
        let next = table.entries().get(index + 1);
        if let Some(next) = next {
            if next.rank() == suffix.rank() + 1 && thousandths >= &scale * &scale {
                index += 1;
                continue;
            }
        }

        return format_thousandths(&thousandths, suffix.symbol());
    }
}

/// Like [`encode_with`], but refuses values whose numeric part would reach
/// 1000 under the table's largest suffix.
pub fn encode_strict(table: &SuffixTable, magnitude: &Magnitude) -> Result<String, NumberError> {
    let ceiling = table.highest().threshold() * power_of_thousand(1);
    if magnitude.as_biguint() >= &ceiling {
        return Err(NumberError::UnsupportedMagnitude(magnitude.to_string()));
    }
    Ok(encode_with(table, magnitude))
}

fn format_thousandths(thousandths: &BigUint, symbol: &str) -> String {
    let digits = thousandths.to_string();
    let digits = if digits.len() <= DISPLAY_DECIMALS {
        format!("{:0>width$}", digits, width = DISPLAY_DECIMALS + 1)
    } else {
        digits
    };
    let (whole, fraction) = digits.split_at(digits.len() - DISPLAY_DECIMALS);
    format!("{}.{}{}", whole, fraction, symbol)
}

/// `encode(|decode(a) − decode(b)|)`, e.g. for "gained this week" deltas.
pub fn difference(a: &str, b: &str) -> Result<String, NumberError> {
    let left = decode(a)?;
    let right = decode(b)?;
    Ok(encode(&left.abs_diff(&right)))
}

/// Exact ratio `numerator / denominator` as `f64`, tolerant of operands
/// beyond `f64` range as long as the ratio itself fits.
pub fn ratio(numerator: &Magnitude, denominator: &Magnitude) -> Option<f64> {
    let (num, den) = (numerator.as_biguint(), denominator.as_biguint());
    if den.is_zero() {
        return None;
    }

    // Drop common low-order bits so both sides fit in f64
    let shift = num.bits().max(den.bits()).saturating_sub(1000);
    let num = Magnitude::new(num >> shift).to_f64();
    let den = Magnitude::new(den >> shift).to_f64();
    let result = num / den;
    (result.is_finite() && den > 0.0).then_some(result)
}
