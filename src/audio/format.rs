//! Bitstream family detection from the leading bytes of an elementary stream

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AtmosDecodeError, Result};

/// Number of leading bytes inspected
pub const SNIFF_LEN: usize = 10;

pub const EAC3_SYNC_WORD: [u8; 2] = [0x0B, 0x77];
pub const TRUEHD_SYNC_WORD: [u8; 4] = [0xF8, 0x72, 0x6F, 0xBA];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Eac3,
    TrueHd,
}

impl StreamFormat {
    pub fn name(&self) -> &'static str {
        match self {
            StreamFormat::Eac3 => "E-AC3",
            StreamFormat::TrueHd => "TrueHD",
        }
    }

    /// File extension used for extracted elementary streams
    pub fn extension(&self) -> &'static str {
        match self {
            StreamFormat::Eac3 => "ec3",
            StreamFormat::TrueHd => "thd",
        }
    }

    /// Classify a header buffer. Only the first `SNIFF_LEN` bytes are considered.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let head = &bytes[..bytes.len().min(SNIFF_LEN)];

        if head.starts_with(&EAC3_SYNC_WORD) {
            Some(StreamFormat::Eac3)
        } else if head.windows(TRUEHD_SYNC_WORD.len()).any(|w| w == TRUEHD_SYNC_WORD) {
            Some(StreamFormat::TrueHd)
        } else {
            None
        }
    }

    pub fn sniff_file(path: &Path) -> Result<Self> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        File::open(path)?.take(SNIFF_LEN as u64).read_to_end(&mut head)?;

        Self::sniff(&head).ok_or_else(|| AtmosDecodeError::UnrecognizedFormat(path.to_path_buf()))
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
