//! Message headers read from a Unix MBOX file.
//!
//! The file is streamed line by line and only the header block of each
//! message is kept; bodies are skipped. Header blocks are decoded with
//! `mail-parser` (RFC 2047 words, address lists, groups, dates).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use mail_parser::{Addr, Address, MessageParser};
use tracing::{info, warn};

use crate::error::{Result, ScanError};
use crate::model::address::{RecipientRef, RecipientRole};
use crate::model::message::MessageRecord;

use super::{parse_timestamp, MessageSource};

/// Size of the internal read buffer.
const READ_BUFFER_SIZE: usize = 128 * 1024;

/// An MBOX file on disk.
pub struct MboxSource {
    path: PathBuf,
}

impl MboxSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MessageSource for MboxSource {
    fn describe(&self) -> String {
        format!("MBOX {}", self.path.display())
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<MessageRecord>> {
        let parser = MessageParser::default();
        let mut records = Vec::new();
        let mut skipped = 0usize;

        let blocks = read_header_blocks(&self.path, &mut |offset, headers| {
            if records.len() >= limit {
                return false;
            }
            match record_from_headers(&parser, headers) {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    warn!(offset = offset, "Skipping unparseable message headers");
                }
            }
            true
        })?;

        if blocks > 0 && records.is_empty() && skipped == blocks {
            return Err(ScanError::InvalidMbox(self.path.clone()));
        }

        info!(
            path = %self.path.display(),
            count = records.len(),
            skipped = skipped,
            "Read MBOX headers"
        );
        Ok(records)
    }
}

/// Stream an MBOX file and call `callback(offset, header_bytes)` for each
/// message, where `header_bytes` starts with the `From ` separator line and
/// ends before the first blank line.
///
/// The callback returns `false` to stop early. Returns the number of header
/// blocks delivered. A file with non-blank content but no `From ` separator
/// line is not an MBOX and yields [`ScanError::InvalidMbox`].
pub fn read_header_blocks(
    path: &Path,
    callback: &mut dyn FnMut(u64, &[u8]) -> bool,
) -> Result<usize> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScanError::FileNotFound(path.to_path_buf())
        } else {
            ScanError::io(path, e)
        }
    })?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut count = 0usize;
    let mut offset: u64 = 0;
    let mut block_start: u64 = 0;
    let mut header_buf: Vec<u8> = Vec::with_capacity(16 * 1024);
    let mut in_headers = false;
    let mut prev_line_was_empty = true;
    let mut saw_separator = false;
    let mut saw_content = false;
    let mut line_buf: Vec<u8> = Vec::with_capacity(4096);

    loop {
        line_buf.clear();
        let read = reader
            .read_until(b'\n', &mut line_buf)
            .map_err(|e| ScanError::io(path, e))?;
        if read == 0 {
            break;
        }

        let blank = is_blank_line(&line_buf);
        saw_content |= !blank;

        if is_mbox_separator(&line_buf) && prev_line_was_empty {
            saw_separator = true;
            if in_headers && !header_buf.is_empty() {
                // Previous message had no body separator; deliver what we have.
                if !callback(block_start, &header_buf) {
                    return Ok(count);
                }
                count += 1;
            }
            header_buf.clear();
            header_buf.extend_from_slice(&line_buf);
            in_headers = true;
            block_start = offset;
        } else if in_headers {
            if blank {
                in_headers = false;
                if !callback(block_start, &header_buf) {
                    return Ok(count);
                }
                count += 1;
                header_buf.clear();
            } else {
                header_buf.extend_from_slice(&line_buf);
            }
        }

        prev_line_was_empty = blank;
        offset += read as u64;
    }

    if saw_content && !saw_separator {
        return Err(ScanError::InvalidMbox(path.to_path_buf()));
    }

    // Truncated final message: headers but no blank line.
    if in_headers && !header_buf.is_empty() && callback(block_start, &header_buf) {
        count += 1;
    }

    Ok(count)
}

/// Decode one header block into a message record.
fn record_from_headers(parser: &MessageParser, block: &[u8]) -> Option<MessageRecord> {
    let headers = skip_from_line(block);
    if headers.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    // Terminate the header block so the parser sees an empty body.
    let mut raw = Vec::with_capacity(headers.len() + 2);
    raw.extend_from_slice(headers);
    raw.extend_from_slice(b"\n");
    let msg = parser.parse(&raw)?;

    let mut recipients = Vec::new();
    push_recipients(&mut recipients, RecipientRole::Primary, msg.to());
    push_recipients(&mut recipients, RecipientRole::Copy, msg.cc());
    push_recipients(&mut recipients, RecipientRole::BlindCopy, msg.bcc());

    Some(MessageRecord {
        subject: msg.subject().map(str::to_string),
        received_at: msg.date().and_then(|d| parse_timestamp(&d.to_rfc3339())),
        recipients,
    })
}

/// Flatten an address header (plain list or groups) into recipient refs.
fn push_recipients(
    out: &mut Vec<RecipientRef>,
    role: RecipientRole,
    header: Option<&Address<'_>>,
) {
    let Some(header) = header else {
        return;
    };
    let addrs: Vec<&Addr<'_>> = match header {
        Address::List(list) => list.iter().collect(),
        Address::Group(groups) => groups.iter().flat_map(|g| g.addresses.iter()).collect(),
    };
    for addr in addrs {
        out.push(RecipientRef {
            role,
            address: addr.address.as_ref().map(|a| a.to_string()),
            display_name: addr.name.as_ref().map(|n| n.to_string()),
        });
    }
}

/// Strip the leading `From ` separator line, if present.
fn skip_from_line(block: &[u8]) -> &[u8] {
    if is_mbox_separator(block) {
        match block.iter().position(|&b| b == b'\n') {
            Some(pos) => &block[pos + 1..],
            None => &[],
        }
    } else {
        block
    }
}

/// Check whether a line is an MBOX separator (`From ` at the start).
fn is_mbox_separator(line: &[u8]) -> bool {
    let line = line.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(line);
    line.starts_with(b"From ")
}

/// Check whether a line is blank (empty or only whitespace / CR / LF).
fn is_blank_line(line: &[u8]) -> bool {
    line.iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b' ' || b == b'\t')
}
