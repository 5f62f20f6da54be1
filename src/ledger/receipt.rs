use crate::ledger::Payout;
use thiserror::Error;

/// Errors that can occur while encoding or decoding a receipt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("Failed to encode receipt: {0}")]
    EncodeError(String),

    #[error("Failed to decode receipt: {0}")]
    DecodeError(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// Compact binary form of a [`Payout`], for logging and off-host records
pub struct ReceiptCodec;

impl ReceiptCodec {
    /// Encode a payout with postcard
    pub fn encode(payout: &Payout) -> Result<Vec<u8>, ReceiptError> {
        postcard::to_allocvec(payout).map_err(|e| ReceiptError::EncodeError(e.to_string()))
    }

    /// Decode a payout from postcard bytes
    pub fn decode(bytes: &[u8]) -> Result<Payout, ReceiptError> {
        postcard::from_bytes(bytes).map_err(|e| ReceiptError::DecodeError(e.to_string()))
    }

    /// Encode to a hex string
    pub fn encode_hex(payout: &Payout) -> Result<String, ReceiptError> {
        Ok(hex::encode(Self::encode(payout)?))
    }

    /// Decode from a hex string
    pub fn decode_hex(hex_str: &str) -> Result<Payout, ReceiptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ReceiptError::InvalidHex(e.to_string()))?;
        Self::decode(&bytes)
    }
}
