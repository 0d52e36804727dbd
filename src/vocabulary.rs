use std::io::{self, Read};

/// Occurrence counts for every possible byte value in a source.
///
/// Built once per archive operation by fully consuming the source; the
/// caller rewinds the source before the pass that actually encodes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    counts: [u32; 256],
}

impl Vocabulary {
    pub const fn empty() -> Self {
        Self { counts: [0; 256] }
    }

    /// Counts every byte remaining in `source` until end of input.
    ///
    /// This pass runs in non-strict read mode: end of input is the normal
    /// terminator, and read faults other than `Interrupted` also end the
    /// scan. Fatal I/O conditions surface on the strict second pass.
    pub fn scan<R: Read>(source: &mut R) -> Self {
        let mut vocabulary = Self::empty();
        let mut chunk = [0u8; 4096];
        loop {
            match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    for &byte in &chunk[..n] {
                        vocabulary.counts[byte as usize] += 1;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        vocabulary
    }

    pub const fn count(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    pub fn set_count(&mut self, symbol: u8, count: u32) {
        self.counts[symbol as usize] = count;
    }

    /// Number of distinct byte values with a non-zero count.
    pub fn distinct_symbols(&self) -> u32 {
        self.counts.iter().filter(|&&c| c != 0).count() as u32
    }

    /// Total bytes scanned into this table.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// `(symbol, count)` pairs with non-zero counts, ascending by symbol.
    pub fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}
