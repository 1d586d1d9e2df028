use std::str::FromStr;

use anyhow::anyhow;
use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};

pub const ETH_DECIMALS: usize = 18;

/// Accepts 40 hex digits with an optional `0x`. Mixed case has to be a valid EIP-55 checksum.
pub fn parse_recipient(input: &str) -> anyhow::Result<Address> {
    let input = input.trim();
    let digits = input.strip_prefix("0x").unwrap_or(input);

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!("Invalid recipient address."));
    }

    let address = Address::from_str(digits).map_err(|_| anyhow!("Invalid recipient address."))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None)[2..] != *digits {
        return Err(anyhow!("Invalid recipient address."));
    }

    Ok(address)
}

/// Parses a decimal ether amount ("1", "0.5", ".25") into wei.
pub fn parse_amount(input: &str) -> anyhow::Result<U256> {
    let input = input.trim();
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty())
        || !is_digits(whole)
        || !is_digits(fraction)
        || fraction.len() > ETH_DECIMALS
    {
        return Err(anyhow!("Invalid amount."));
    }

    let wei = format!("{}{:0<width$}", whole, fraction, width = ETH_DECIMALS);
    U256::from_dec_str(&wei).map_err(|_| anyhow!("Invalid amount."))
}

pub fn ensure_sufficient_balance(balance: U256, amount: U256) -> anyhow::Result<()> {
    if balance < amount {
        return Err(anyhow!("Insufficient balance."));
    }

    Ok(())
}

pub fn resolve_rpc_url(input: &str, default: &str) -> String {
    match input.trim() {
        "" => default.to_string(),
        url => url.to_string(),
    }
}
