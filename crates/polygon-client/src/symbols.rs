/// Vendor prefixes that mark a symbol as already in vendor form.
const VENDOR_PREFIXES: [&str; 3] = ["X:", "I:", "C:"];

const CRYPTO_PREFIX: &str = "X:";
const CRYPTO_QUOTE_SUFFIX: &str = "-USD";

/// Market a vendor symbol belongs to; decides which snapshot endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Stock,
    Crypto,
}

/// Translate a sanitized symbol into the vendor's own convention.
///
/// `BTC-USD` becomes `X:BTCUSD`. Symbols that already carry a vendor prefix,
/// and everything else, pass through unchanged.
pub fn to_vendor_symbol(symbol: &str) -> String {
    if VENDOR_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
        return symbol.to_string();
    }

    match symbol.strip_suffix(CRYPTO_QUOTE_SUFFIX) {
        Some(base) if !base.is_empty() => format!("{}{}USD", CRYPTO_PREFIX, base),
        _ => symbol.to_string(),
    }
}

pub fn asset_class(vendor_symbol: &str) -> AssetClass {
    if vendor_symbol.starts_with(CRYPTO_PREFIX) {
        AssetClass::Crypto
    } else {
        AssetClass::Stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_pair_translation() {
        assert_eq!(to_vendor_symbol("BTC-USD"), "X:BTCUSD");
        assert_eq!(to_vendor_symbol("ETH-USD"), "X:ETHUSD");
        assert_eq!(asset_class("X:BTCUSD"), AssetClass::Crypto);
    }

    #[test]
    fn test_plain_symbols_pass_through() {
        assert_eq!(to_vendor_symbol("AAPL"), "AAPL");
        assert_eq!(to_vendor_symbol("BRK.B"), "BRK.B");
        assert_eq!(to_vendor_symbol("-USD"), "-USD");
        assert_eq!(to_vendor_symbol("X:SOLUSD"), "X:SOLUSD");
        assert_eq!(to_vendor_symbol("I:SPX"), "I:SPX");
        assert_eq!(asset_class("AAPL"), AssetClass::Stock);
    }

    #[test]
    fn test_translation_is_stable() {
        for sym in ["BTC-USD", "AAPL", "^GSPC", "X:ETHUSD"] {
            let once = to_vendor_symbol(sym);
            assert_eq!(to_vendor_symbol(&once), once);
        }
    }
}
