use std::fmt::Display;

use ethers::types::{TransactionReceipt, TxHash, U64};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
    /// The node answered without a receipt, e.g. the transaction was dropped.
    Missing,
}

impl ReceiptStatus {
    pub fn from_receipt(receipt: Option<&TransactionReceipt>) -> ReceiptStatus {
        match receipt {
            Some(receipt) if receipt.status == Some(U64::one()) => ReceiptStatus::Success,
            Some(_) => ReceiptStatus::Failed,
            None => ReceiptStatus::Missing,
        }
    }
}

impl Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptStatus::Success => write!(f, "Success"),
            ReceiptStatus::Failed => write!(f, "Failed"),
            ReceiptStatus::Missing => write!(f, "Missing"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransferOutcome {
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
}

impl Display for TransferOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            ReceiptStatus::Missing => write!(
                f,
                "Transaction sent! Hash: {:#x} (no receipt returned)",
                self.tx_hash
            ),
            status => write!(
                f,
                "Transaction sent! Hash: {:#x}\nStatus: {}",
                self.tx_hash, status
            ),
        }
    }
}
