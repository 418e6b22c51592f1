//! File content probing
//!
//! Binary/text classification and line counting. The probe never interprets
//! content beyond byte-level sniffing and UTF-8 decoding.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes sniffed from the head of a file for the NUL check
const SNIFF_LEN: u64 = 1024;

const CHUNK_LEN: usize = 8192;

/// Outcome of probing one file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProbe {
    pub is_binary: bool,
    pub number_of_lines: u64,
}

impl FileProbe {
    fn binary() -> Self {
        Self {
            is_binary: true,
            number_of_lines: 0,
        }
    }
}

/// Classify a file as binary or text and count its lines.
///
/// A NUL byte within the first 1024 bytes marks the file binary. Otherwise
/// lines are counted by streaming the content as UTF-8; a decode failure
/// mid-stream reclassifies the file as binary with zero lines.
pub fn probe_file(path: &Path) -> io::Result<FileProbe> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    if head.contains(&0) {
        return Ok(FileProbe::binary());
    }

    match count_lines(&mut File::open(path)?)? {
        Some(number_of_lines) => Ok(FileProbe {
            is_binary: false,
            number_of_lines,
        }),
        None => Ok(FileProbe::binary()),
    }
}

/// Count text lines in a stream; `None` means the stream is not valid UTF-8.
///
/// Counts the way a text-mode line iterator does: an unterminated trailing
/// line still counts as one line.
fn count_lines(reader: &mut impl Read) -> io::Result<Option<u64>> {
    let mut buf = [0u8; CHUNK_LEN];
    // carries an incomplete UTF-8 sequence across chunk boundaries
    let mut pending: Vec<u8> = Vec::new();
    let mut lines = 0u64;
    let mut last_byte = b'\n';

    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            if !pending.is_empty() {
                // stream ended inside a multi-byte sequence
                return Ok(None);
            }
            if last_byte != b'\n' {
                lines += 1;
            }
            return Ok(Some(lines));
        }

        let chunk = &buf[..read];
        pending.extend_from_slice(chunk);
        match std::str::from_utf8(&pending) {
            Ok(_) => pending.clear(),
            Err(e) if e.error_len().is_none() => {
                pending.drain(..e.valid_up_to());
            }
            Err(_) => return Ok(None),
        }

        lines += chunk.iter().filter(|&&b| b == b'\n').count() as u64;
        last_byte = chunk[read - 1];
    }
}
