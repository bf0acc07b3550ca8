// src/crtsh/decoder.rs
//! Decoder for crt.sh JSON output.
//!
//! crt.sh does not always answer with a single JSON document: large result
//! sets arrive as several JSON arrays written back to back with nothing
//! between them (`[{..},{..}][{..}]`). Arrays are read one after another
//! until the input runs out.
//!
//! Any decode error ends the loop and whatever was read so far is kept.
//! The reason the loop stopped is reported in [`StreamEnd`] so a truncated
//! body can be told apart from a clean one.

use crate::types::CertificateRecord;
use serde_json::Deserializer;
use tracing::{debug, warn};

/// Why decoding stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Input ended cleanly after the last array
    Exhausted,
    /// Input ended in the middle of an array
    Truncated,
    /// Input contained something that is not an array of records
    Malformed,
}

/// Records read from a response body
#[derive(Debug)]
pub struct Decoded {
    pub records: Vec<CertificateRecord>,
    pub arrays: usize,
    pub end: StreamEnd,
}

/// Read every back-to-back JSON array of records from `body`
pub fn decode_concatenated(body: &[u8]) -> Decoded {
    let mut records = Vec::new();
    let mut arrays = 0;
    let mut end = StreamEnd::Exhausted;

    let stream = Deserializer::from_slice(body).into_iter::<Vec<CertificateRecord>>();

    for batch in stream {
        match batch {
            Ok(batch) => {
                arrays += 1;
                records.extend(batch);
            }
            Err(e) => {
                end = if e.is_eof() {
                    StreamEnd::Truncated
                } else {
                    StreamEnd::Malformed
                };
                match end {
                    StreamEnd::Truncated => warn!(
                        "Response body ended mid-array after {} records; using what was read: {}",
                        records.len(),
                        e
                    ),
                    _ => warn!(
                        "Stopped decoding response after {} records: {}",
                        records.len(),
                        e
                    ),
                }
                break;
            }
        }
    }

    debug!(
        "Decoded {} records from {} JSON arrays ({:?})",
        records.len(),
        arrays,
        end
    );

    Decoded {
        records,
        arrays,
        end,
    }
}
