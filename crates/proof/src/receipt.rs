//! Receipt decoding and log extraction.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::errors::{ProofError, ProofResult};

/// Fields a well-formed receipt carries: status, cumulative gas, log bloom,
/// log list.
pub const RECEIPT_FIELD_COUNT: usize = 4;

const LOG_LIST_FIELD: usize = 3;

/// A single log entry inside a receipt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    pub address: Vec<u8>,
    pub topics: Vec<Vec<u8>>,
    pub data: Vec<u8>,
}

impl Encodable for LogEntry {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.address);
        s.append_list::<Vec<u8>, _>(&self.topics);
        s.append(&self.data);
    }
}

impl Decodable for LogEntry {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        Ok(Self {
            address: rlp.val_at(0)?,
            topics: rlp.list_at(1)?,
            data: rlp.val_at(2)?,
        })
    }
}

/// A decoded transaction receipt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    pub status: u64,
    pub cumulative_gas_used: u64,
    pub bloom: Vec<u8>,
    pub logs: Vec<LogEntry>,
}

impl Encodable for Receipt {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(RECEIPT_FIELD_COUNT);
        s.append(&self.status);
        s.append(&self.cumulative_gas_used);
        s.append(&self.bloom);
        s.append_list(&self.logs);
    }
}

impl Decodable for Receipt {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        Ok(Self {
            status: rlp.val_at(0)?,
            cumulative_gas_used: rlp.val_at(1)?,
            bloom: rlp.val_at(2)?,
            logs: rlp.list_at(LOG_LIST_FIELD)?,
        })
    }
}

/// Decodes receipt bytes fully into a [`Receipt`].
pub fn decode_receipt(receipt_bytes: &[u8]) -> ProofResult<Receipt> {
    let rlp = Rlp::new(receipt_bytes);
    if !rlp.is_list() {
        return Err(ProofError::NotAList);
    }
    let fields = rlp.item_count()?;
    if fields < RECEIPT_FIELD_COUNT {
        return Err(ProofError::TruncatedReceipt {
            fields,
            expected: RECEIPT_FIELD_COUNT,
        });
    }
    Ok(Receipt::decode(&rlp)?)
}

/// Returns the raw RLP bytes of the log at `log_index` inside the receipt.
///
/// The receipt shape is validated only as far as reaching the log list;
/// callers wanting the full structure use [`decode_receipt`].
pub fn extract_log(receipt_bytes: &[u8], log_index: usize) -> ProofResult<Vec<u8>> {
    let rlp = Rlp::new(receipt_bytes);
    if !rlp.is_list() {
        return Err(ProofError::NotAList);
    }
    let fields = rlp.item_count()?;
    if fields < RECEIPT_FIELD_COUNT {
        return Err(ProofError::TruncatedReceipt {
            fields,
            expected: RECEIPT_FIELD_COUNT,
        });
    }
    let logs = rlp.at(LOG_LIST_FIELD)?;
    let count = logs.item_count()?;
    if log_index >= count {
        return Err(ProofError::LogIndexOutOfBounds {
            index: log_index,
            count,
        });
    }
    Ok(logs.at(log_index)?.as_raw().to_vec())
}
