//! Asset-string codec.
//!
//! Monetary values travel as fixed-point strings, `"1.0000 EOS"`. The
//! decimal count is symbol-dependent and must match the symbol's canonical
//! precision exactly or the node rejects the transaction, so formatting
//! always goes through a [`SymbolTable`].

use std::collections::HashMap;

use fastnum::{D128, decimal::Context};

use crate::{
    error::{Error, Result},
    num,
};

/// Symbol precision configuration.
///
/// Immutable after construction; built once per deployment and injected
/// into everything that formats amounts. [`SymbolTable::default`] carries
/// the precisions of the symbols the contracts operate with.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    decimals: HashMap<String, u32>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            decimals: HashMap::from([
                ("EOS".to_string(), 4),
                ("PBTC".to_string(), 8),
                ("EOSDT".to_string(), 9),
                ("NUT".to_string(), 9),
                ("PETH".to_string(), 9),
            ]),
        }
    }
}

impl SymbolTable {
    /// Adds or replaces the canonical precision for a symbol.
    pub fn with_symbol(mut self, symbol: &str, decimals: u32) -> Self {
        self.decimals.insert(symbol.to_uppercase(), decimals);
        self
    }

    /// Canonical decimal count for a symbol, if known.
    /// Symbols are case-insensitive.
    pub fn decimals_for(&self, symbol: &str) -> Option<u32> {
        self.decimals.get(&symbol.to_uppercase()).copied()
    }

    /// Resolves the fixed-point converter for a symbol.
    ///
    /// A known symbol's table entry takes precedence over the
    /// `custom_decimals` override. An unknown symbol without an override
    /// fails with [`Error::UnknownSymbol`].
    pub fn converter_for(
        &self,
        symbol: &str,
        custom_decimals: Option<u32>,
    ) -> Result<num::Converter> {
        self.decimals_for(symbol)
            .or(custom_decimals)
            .map(num::Converter::new)
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_uppercase()))
    }

    /// Formats an amount as the canonical `"<fixed-point> <SYMBOL>"` string.
    ///
    /// The amount is rescaled to exactly the symbol's decimal count.
    /// Negative amounts pass through unchanged, sign validity is the
    /// caller's concern.
    pub fn amount_to_asset_string(
        &self,
        amount: D128,
        symbol: &str,
        custom_decimals: Option<u32>,
    ) -> Result<String> {
        let converter = self.converter_for(symbol, custom_decimals)?;
        let units = converter.to_units(amount);
        Ok(format!(
            "{} {}",
            format_units(units, converter.decimals()),
            symbol.to_uppercase()
        ))
    }
}

fn format_units(units: i128, decimals: u32) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs();
    if decimals == 0 {
        return format!("{sign}{magnitude}");
    }
    let scale = 10u128.pow(decimals);
    format!(
        "{sign}{}.{:0width$}",
        magnitude / scale,
        magnitude % scale,
        width = decimals as usize
    )
}

/// Splits an asset string into quantity and symbol.
pub fn parse_asset(asset: &str) -> Result<(D128, String)> {
    let mut parts = asset.split_whitespace();
    let (Some(quantity), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::MalformedBalance(format!(
            "not an asset string: {asset:?}"
        )));
    };
    let quantity = D128::from_str(quantity, Context::default())
        .map_err(|_| Error::MalformedBalance(format!("not an asset string: {asset:?}")))?;
    Ok((quantity, symbol.to_uppercase()))
}

/// Extracts the numeric quantity from a currency-balance response.
///
/// The balance query returns a list of asset strings; an empty list means
/// the account holds no balance row and yields zero. Otherwise the first
/// entry must start with a numeric run (digits, commas, periods), which is
/// parsed with the separators stripped.
pub fn balance_to_number(entries: &[String]) -> Result<D128> {
    let Some(first) = entries.first() else {
        return Ok(D128::ZERO);
    };
    let numeric: String = first
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    if numeric.is_empty() {
        return Err(Error::MalformedBalance(format!(
            "no numeric prefix in {first:?}"
        )));
    }
    D128::from_str(&numeric, Context::default())
        .map_err(|_| Error::MalformedBalance(format!("no numeric prefix in {first:?}")))
}

#[cfg(test)]
mod tests {
    use fastnum::dec128;

    use super::*;

    #[test]
    fn test_amount_to_asset_string() {
        let symbols = SymbolTable::default();
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1), "EOS", None)
                .unwrap(),
            "1.0000 EOS"
        );
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(12.345), "PBTC", None)
                .unwrap(),
            "12.34500000 PBTC"
        );
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(0.5), "EOSDT", None)
                .unwrap(),
            "0.500000000 EOSDT"
        );
    }

    #[test]
    fn test_amount_from_string_input() {
        let symbols = SymbolTable::default();
        let amount = D128::from_str("2.5", Context::default()).unwrap();
        assert_eq!(
            symbols.amount_to_asset_string(amount, "EOS", None).unwrap(),
            "2.5000 EOS"
        );
    }

    #[test]
    fn test_symbol_case_insensitive() {
        let symbols = SymbolTable::default();
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1), "eos", None)
                .unwrap(),
            "1.0000 EOS"
        );
    }

    #[test]
    fn test_rounds_half_up_at_precision_boundary() {
        let symbols = SymbolTable::default();
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1.00005), "EOS", None)
                .unwrap(),
            "1.0001 EOS"
        );
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1.00004), "EOS", None)
                .unwrap(),
            "1.0000 EOS"
        );
    }

    #[test]
    fn test_negative_amount_passes_through() {
        let symbols = SymbolTable::default();
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(-1.5), "EOS", None)
                .unwrap(),
            "-1.5000 EOS"
        );
    }

    #[test]
    fn test_table_precision_wins_over_override() {
        let symbols = SymbolTable::default();
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1), "EOS", Some(2))
                .unwrap(),
            "1.0000 EOS"
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let symbols = SymbolTable::default();
        assert!(matches!(
            symbols.amount_to_asset_string(dec128!(1), "UNKNOWN", None),
            Err(Error::UnknownSymbol(s)) if s == "UNKNOWN"
        ));
        assert_eq!(
            symbols
                .amount_to_asset_string(dec128!(1), "UNKNOWN", Some(2))
                .unwrap(),
            "1.00 UNKNOWN"
        );
    }

    #[test]
    fn test_parse_asset() {
        let (quantity, symbol) = parse_asset("2.0000 EOS").unwrap();
        assert_eq!(quantity, dec128!(2));
        assert_eq!(symbol, "EOS");

        assert!(parse_asset("EOS").is_err());
        assert!(parse_asset("two EOS").is_err());
    }

    #[test]
    fn test_balance_to_number() {
        assert_eq!(balance_to_number(&[]).unwrap(), D128::ZERO);
        assert_eq!(
            balance_to_number(&["12.3456 EOS".to_string()]).unwrap(),
            dec128!(12.3456)
        );
        assert_eq!(
            balance_to_number(&["1,234.5678 EOS".to_string()]).unwrap(),
            dec128!(1234.5678)
        );
        assert!(matches!(
            balance_to_number(&["no-numbers".to_string()]),
            Err(Error::MalformedBalance(_))
        ));
    }
}
