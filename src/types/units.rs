//! Ether denominations and amount formatting.

use alloy::primitives::U256;

/// Denomination an amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Unit {
    #[default]
    #[value(name = "wei")]
    Wei,
    #[value(name = "Kwei")]
    Kwei,
    #[value(name = "Mwei")]
    Mwei,
    #[value(name = "Gwei")]
    Gwei,
    #[value(name = "microether")]
    Microether,
    #[value(name = "milliether")]
    Milliether,
    #[value(name = "ether")]
    Ether,
}

impl Unit {
    /// Power of ten separating this unit from wei.
    pub fn decimals(self) -> u8 {
        match self {
            Unit::Wei => 0,
            Unit::Kwei => 3,
            Unit::Mwei => 6,
            Unit::Gwei => 9,
            Unit::Microether => 12,
            Unit::Milliether => 15,
            Unit::Ether => 18,
        }
    }

    /// Name as printed next to amounts.
    pub fn name(self) -> &'static str {
        match self {
            Unit::Wei => "wei",
            Unit::Kwei => "Kwei",
            Unit::Mwei => "Mwei",
            Unit::Gwei => "Gwei",
            Unit::Microether => "microether",
            Unit::Milliether => "milliether",
            Unit::Ether => "ether",
        }
    }

    /// Convert a wei amount into this unit.
    pub fn from_wei(self, value: U256) -> String {
        format_units(value, self.decimals())
    }

    /// Convert an amount in this unit into wei.
    pub fn to_wei(self, amount: &str) -> Result<U256, String> {
        parse_units(amount, self.decimals())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a wei amount in the largest of ether, Gwei and wei that is at
/// least one unit, e.g. `1 Gwei`, `2000 ether`, `1.5 ether`.
pub fn format_amount(value: U256) -> String {
    let unit = [Unit::Ether, Unit::Gwei]
        .into_iter()
        .find(|unit| value >= U256::from(10).pow(U256::from(unit.decimals())))
        .unwrap_or(Unit::Wei);

    format!("{} {}", unit.from_wei(value), unit)
}

/// Format a U256 value with decimals to a human-readable string.
pub fn format_units(value: U256, decimals: u8) -> String {
    if value == U256::ZERO {
        return "0".to_string();
    }

    let value_str = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return value_str;
    }

    let len = value_str.len();
    if len <= decimals {
        // Value is less than 1, pad with zeros
        let zeros = decimals - len;
        let decimal_part = value_str.trim_end_matches('0');
        format!("0.{}{}", "0".repeat(zeros), decimal_part)
    } else {
        let (integer, decimal) = value_str.split_at(len - decimals);
        let decimal = decimal.trim_end_matches('0');
        if decimal.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, decimal)
        }
    }
}

/// Parse a human-readable amount string to U256 with decimals.
///
/// Fraction digits beyond `decimals` are rejected rather than truncated so a
/// transfer never moves less than was asked for.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, String> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if amount.starts_with('-') {
        return Err("Amount cannot be negative".to_string());
    }

    let decimals = decimals as usize;
    let multiplier = U256::from(10).pow(U256::from(decimals));
    let parts: Vec<&str> = amount.split('.').collect();

    match parts.as_slice() {
        [integer] => {
            let value = integer.parse::<U256>().map_err(|e| format!("Invalid amount: {}", e))?;
            value.checked_mul(multiplier).ok_or_else(|| "Amount too large".to_string())
        }
        [integer, fraction] => {
            if integer.is_empty() && fraction.is_empty() {
                return Err("Invalid amount format".to_string());
            }

            let fraction = fraction.trim_end_matches('0');
            if fraction.len() > decimals {
                return Err(format!("Amount has more than {} decimal places", decimals));
            }
            let fraction = format!("{}{}", fraction, "0".repeat(decimals - fraction.len()));

            let integer_value = if integer.is_empty() {
                U256::ZERO
            } else {
                integer.parse::<U256>().map_err(|e| format!("Invalid integer part: {}", e))?
            };

            let fraction_value = if fraction.is_empty() {
                U256::ZERO
            } else {
                fraction.parse::<U256>().map_err(|e| format!("Invalid fraction part: {}", e))?
            };

            integer_value
                .checked_mul(multiplier)
                .and_then(|v| v.checked_add(fraction_value))
                .ok_or_else(|| "Amount too large".to_string())
        }
        _ => Err("Invalid amount format".to_string()),
    }
}
