//! Byte-offset to line-number mapping.
//!
//! Precomputes line start offsets once per file so the walker can turn
//! span offsets into 1-based line numbers without rescanning the source.

/// Maps byte offsets into a source string to 1-based line numbers.
pub struct LineMap {
    starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        LineMap { starts }
    }

    /// 1-based line number containing `offset`.
    pub fn line(&self, offset: u32) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}
