use std::io::{BufRead, Write};

use anyhow::{anyhow, Context};
use common::utils::{parse_amount, parse_recipient, resolve_rpc_url};
use ethers::types::{Address, U256};

#[derive(Debug, PartialEq)]
pub(crate) struct TransferRequest {
    pub to: Address,
    pub amount: U256,
    pub rpc_url: String,
}

pub(crate) fn password(message: &str) -> anyhow::Result<String> {
    rpassword::prompt_password(format!("{} ", message)).context("Failed to read password.")
}

pub(crate) fn line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> anyhow::Result<String> {
    write!(writer, "{} ", message)?;
    writer.flush()?;

    let mut answer = String::new();
    if reader.read_line(&mut answer)? == 0 {
        return Err(anyhow!("No input provided."));
    }

    Ok(answer.trim().to_string())
}

/// Asks for recipient, amount and RPC URL in that order, bailing on the first bad answer.
pub(crate) fn collect_transfer_request<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    default_rpc_url: &str,
) -> anyhow::Result<TransferRequest> {
    let to = parse_recipient(&line(reader, writer, "Enter recipient address:")?)?;
    let amount = parse_amount(&line(reader, writer, "Enter amount of ETH to send:")?)?;

    let rpc_message = format!(
        "Enter RPC URL (leave blank for default: {}):",
        default_rpc_url
    );
    let rpc_url = resolve_rpc_url(&line(reader, writer, &rpc_message)?, default_rpc_url);

    Ok(TransferRequest {
        to,
        amount,
        rpc_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DEFAULT_RPC: &str = "https://sepolia.drpc.org";
    const RECIPIENT: &str = "0xbeaffe58538eafe49d1e4455500bc659f5d37433";

    fn collect(script: &str) -> (anyhow::Result<TransferRequest>, String) {
        let mut reader = Cursor::new(script.as_bytes().to_vec());
        let mut writer = Vec::new();
        let request = collect_transfer_request(&mut reader, &mut writer, DEFAULT_RPC);

        (request, String::from_utf8(writer).unwrap())
    }

    #[test]
    fn blank_rpc_answer_takes_default() -> anyhow::Result<()> {
        let (request, transcript) = collect(&format!("{}\n0.5\n\n", RECIPIENT));
        let request = request?;

        assert_eq!(request.to, RECIPIENT.parse::<Address>()?);
        assert_eq!(request.amount, U256::exp10(17) * 5);
        assert_eq!(request.rpc_url, DEFAULT_RPC);
        assert!(transcript.contains("leave blank for default: https://sepolia.drpc.org"));

        Ok(())
    }

    #[test]
    fn explicit_rpc_answer_wins() -> anyhow::Result<()> {
        let (request, _) = collect(&format!("{}\n1\nhttp://localhost:8545\n", RECIPIENT));

        assert_eq!(request?.rpc_url, "http://localhost:8545");

        Ok(())
    }

    #[test]
    fn bad_address_stops_before_amount_prompt() {
        let (request, transcript) = collect("0x1234\n0.5\n\n");

        assert_eq!(request.unwrap_err().to_string(), "Invalid recipient address.");
        assert!(!transcript.contains("Enter amount"));
    }

    #[test]
    fn bad_amount_stops_before_rpc_prompt() {
        let (request, transcript) = collect(&format!("{}\nlots\n\n", RECIPIENT));

        assert_eq!(request.unwrap_err().to_string(), "Invalid amount.");
        assert!(!transcript.contains("Enter RPC URL"));
    }

    #[test]
    fn closed_stdin_is_an_error() {
        let (request, _) = collect(RECIPIENT);
        let err = request.unwrap_err();

        // the recipient line had no newline but was still read; the amount prompt hit EOF
        assert_eq!(err.to_string(), "No input provided.");
    }
}
