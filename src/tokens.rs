/// Static token registry for the Base network plus raw/human amount helpers.
///
/// Tokens are immutable and keyed by contract address (unique, compared
/// case-insensitively). The list mirrors the assets tradable through the
/// Raindex orderbook deployment on Base.
use alloy_primitives::U256;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_uri: Option<String>,
    pub is_stablecoin: bool,
}

fn token(
    address: &str,
    symbol: &str,
    name: &str,
    decimals: u8,
    logo_uri: &str,
    is_stablecoin: bool,
) -> Token {
    Token {
        address: address.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        decimals,
        logo_uri: Some(logo_uri.to_string()),
        is_stablecoin,
    }
}

pub static BASE_TOKENS: Lazy<Vec<Token>> = Lazy::new(|| {
    vec![
        token(
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            "USDC",
            "USD Coin",
            6,
            "https://assets.coingecko.com/coins/images/6319/small/usdc.png",
            true,
        ),
        token(
            "0x4200000000000000000000000000000000000006",
            "WETH",
            "Wrapped Ether",
            18,
            "https://assets.coingecko.com/coins/images/2518/small/weth.png",
            false,
        ),
        token(
            "0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb",
            "DAI",
            "Dai Stablecoin",
            18,
            "https://assets.coingecko.com/coins/images/9956/small/dai-multi-collateral-mcd.png",
            true,
        ),
        token(
            "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA",
            "USDbC",
            "USD Base Coin",
            6,
            "https://assets.coingecko.com/coins/images/6319/small/usdc.png",
            true,
        ),
        token(
            "0xff647ad8c4b065bd746911bb9ea1a33c38c63604",
            "tMSTR",
            "MicroStrategy Incorporated ST0x",
            18,
            "https://s3-symbol-logo.tradingview.com/strategy-cad-hedged-cibc-cdr--big.svg",
            false,
        ),
        token(
            "0x2Ae3F1Ec7F1F5012CFEab0185bfc7aa3cf0DEc22",
            "cbETH",
            "Coinbase Wrapped Staked ETH",
            18,
            "https://assets.coingecko.com/coins/images/27008/small/cbeth.png",
            false,
        ),
        token(
            "0x60a3E35Cc302bFA44Cb288Bc5a4F316Fdb1adb42",
            "EURC",
            "Euro Coin",
            6,
            "https://assets.coingecko.com/coins/images/26045/small/euro-coin.png",
            true,
        ),
        token(
            "0x1C7a460413dD4e964f96D8dFC56E7223cE88CD85",
            "tTSLA",
            "Tesla Inc ST0x",
            18,
            "https://s3-symbol-logo.tradingview.com/tesla--big.svg",
            false,
        ),
        token(
            "0x8d8c315db61f60dcc3c66cdb48ca87fc643e35ea",
            "tAMZN",
            "Amazon.com Inc ST0x",
            18,
            "https://s3-symbol-logo.tradingview.com/amazon--big.svg",
            false,
        ),
        token(
            "0x69fca9f7fad46a7eef3acef5beac9df5b7eca73b",
            "tNVDA",
            "NVIDIA Corporation ST0x",
            18,
            "https://s3-symbol-logo.tradingview.com/nvidia--big.svg",
            false,
        ),
    ]
});

/// Case-insensitive address lookup.
pub fn find_by_address(address: &str) -> Option<&'static Token> {
    BASE_TOKENS
        .iter()
        .find(|t| t.address.eq_ignore_ascii_case(address))
}

pub fn find_by_symbol(symbol: &str) -> Option<&'static Token> {
    BASE_TOKENS.iter().find(|t| t.symbol == symbol)
}

/// Converts a human-readable decimal amount to raw token units
/// (amount x 10^decimals), using exact string arithmetic.
///
/// Fractional digits beyond the token's precision are truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Option<U256> {
    let amount = amount.trim();
    if amount.is_empty() || amount.starts_with('-') {
        return None;
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut frac = frac_part.to_string();
    frac.truncate(decimals as usize);
    while frac.len() < decimals as usize {
        frac.push('0');
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let digits = format!("{}{}", int_part, frac);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    U256::from_str_radix(&digits, 10).ok()
}

/// Converts raw token units back to a human-readable decimal string.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let split = padded.len() - decimals;
    let int_part = &padded[..split];
    let frac_part = padded[split..].trim_end_matches('0');

    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Display formatting for human amounts, scaled to magnitude.
pub fn format_token_amount(amount: f64) -> String {
    if amount == 0.0 {
        return "0".to_string();
    }
    if amount < 0.001 {
        return format!("{:.2e}", amount);
    }
    if amount < 1.0 {
        return format!("{:.6}", amount);
    }
    if amount < 1000.0 {
        return format!("{:.4}", amount);
    }
    format!("{:.2}", amount)
}
