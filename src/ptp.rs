use crate::error::ConvertError;
use tracing::{debug, warn};

/// Bytes before the first block record.
pub const LEAD_IN: usize = 3;
/// Id byte plus the little-endian length word.
pub const BLOCK_HEADER_LEN: usize = 3;

pub const BLOCK_ID_A: u8 = 0x55;
pub const BLOCK_ID_B: u8 = 0xAA;

/// One length-prefixed record of a PTP image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based position in the stream
    pub index: usize,
    /// Offset of the id byte within the file
    pub offset: usize,
    pub id: u8,
    pub payload: &'a [u8],
}

impl Block<'_> {
    /// Total record size including the header.
    pub fn record_len(&self) -> usize {
        BLOCK_HEADER_LEN + self.payload.len()
    }
}

pub fn is_block_id(id: u8) -> bool {
    id == BLOCK_ID_A || id == BLOCK_ID_B
}

/// Iterator over the blocks of a PTP image.
///
/// Stops quietly at the first unknown id. A block whose payload runs past
/// the end of the input is yielded once as `TruncatedInput`, after which
/// the iterator is exhausted.
pub struct Blocks<'a> {
    data: &'a [u8],
    cursor: usize,
    index: usize,
    done: bool,
}

impl<'a> Blocks<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: LEAD_IN,
            index: 1,
            done: false,
        }
    }

    /// Offset where the next record would start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<Block<'a>, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor + BLOCK_HEADER_LEN >= self.data.len() {
            self.done = true;
            return None;
        }

        let offset = self.cursor;
        let id = self.data[offset];
        if !is_block_id(id) {
            warn!("Aborting at offset {}: block id error ({:#04x})", offset, id);
            self.done = true;
            return None;
        }

        let declared = u16::from_le_bytes([self.data[offset + 1], self.data[offset + 2]]) as usize;
        if declared == 0 {
            warn!("Block {} has zero length", self.index);
        }
        debug!("Block {}: ID={:02x}, LEN={}", self.index, id, declared);

        let start = offset + BLOCK_HEADER_LEN;
        let available = self.data.len() - start;
        if declared > available {
            self.done = true;
            return Some(Err(ConvertError::TruncatedInput {
                block: self.index,
                offset,
                declared,
                available,
            }));
        }

        let block = Block {
            index: self.index,
            offset,
            id,
            payload: &self.data[start..start + declared],
        };
        self.cursor = start + declared;
        self.index += 1;
        Some(Ok(block))
    }
}
