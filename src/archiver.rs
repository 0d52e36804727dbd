use std::io::{self, Read, Seek, SeekFrom, Write};

use thiserror::Error;

use crate::bitqueue::BitQueue;
use crate::tree::HuffTree;
use crate::vocabulary::Vocabulary;

/// Errors emitted by an archive operation.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("couldn't open source file: {0}")]
    OpenSource(#[source] io::Error),

    #[error("couldn't create sink file: {0}")]
    OpenSink(#[source] io::Error),

    /// A mandatory header or payload read ended short of the bytes the
    /// archive claims to contain.
    #[error("archive is truncated: {0}")]
    TruncatedArchive(#[source] io::Error),

    /// The decode walk reached a position the tree does not have; the
    /// payload cannot have been produced by the header's vocabulary.
    #[error("archive payload is corrupt: bit walk left the code tree")]
    CorruptStream,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Byte length of a `(symbol: u8, frequency: u32)` vocabulary entry.
const ENTRY_SIZE: u32 = 1 + 4;

/// Drives one encode or one decode over a source/sink pair.
///
/// Archive layout, all integers in native byte order:
///
/// ```text
/// [original_size : u32]
/// [vocabulary_count : u32]
/// vocabulary_count times: [symbol : u8][frequency : u32]
/// [packed payload bytes, padded with trailing 0 bits]
/// ```
///
/// An instance performs exactly one directional operation; running a
/// second operation over the same streams without repositioning them is
/// the caller's bug and produces concatenated garbage.
pub struct Archiver<R, W> {
    source: R,
    sink: W,
    original_size: u32,
    payload_size: u32,
    header_size: u32,
}

impl<R: Read + Seek, W: Write> Archiver<R, W> {
    pub fn new(source: R, sink: W) -> Self {
        Self {
            source,
            sink,
            original_size: 0,
            payload_size: 0,
            header_size: 0,
        }
    }

    /// Bytes of original data: scanned on encode, restored on decode.
    pub fn original_size(&self) -> u32 {
        self.original_size
    }

    /// Packed payload bytes written (encode) or consumed (decode),
    /// excluding the header.
    pub fn payload_size(&self) -> u32 {
        self.payload_size
    }

    /// Header bytes written (encode) or consumed (decode).
    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    /// Compresses the source into the sink.
    ///
    /// Scans the whole source once for frequencies, rewinds, then replays
    /// it through the codebook into the packed bitstream.
    pub fn encode(&mut self) -> Result<()> {
        let vocabulary = Vocabulary::scan(&mut self.source);
        let tree = HuffTree::new(&vocabulary);

        self.original_size = vocabulary.total() as u32;
        self.write_header(&vocabulary)?;
        self.source.seek(SeekFrom::Start(0))?;

        let mut queue = BitQueue::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match self.source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            };
            for &byte in &chunk[..n] {
                for &bit in tree.code(byte) {
                    queue.push(bit);
                }
                self.drain_full_bytes(&mut queue)?;
            }
        }

        queue.pad_to_byte();
        self.drain_full_bytes(&mut queue)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Decompresses the source into the sink.
    ///
    /// Header reads are strict: a short read is a truncated archive. The
    /// payload loop refills the bit queue one byte at a time and stops
    /// once exactly `original_size` symbols have been emitted.
    pub fn decode(&mut self) -> Result<()> {
        self.original_size = self.read_u32()?;
        let vocabulary = self.read_vocabulary()?;
        let tree = HuffTree::new(&vocabulary);
        let mut cursor = tree.cursor();

        let mut queue = BitQueue::new();
        let mut emitted: u32 = 0;
        while emitted < self.original_size {
            if queue.is_empty() {
                let mut byte = [0u8; 1];
                self.source.read_exact(&mut byte).map_err(ArchiveError::TruncatedArchive)?;
                self.payload_size += 1;
                queue.unpack(byte[0]);
            }
            if let Some(symbol) = cursor.advance(&mut queue)? {
                self.sink.write_all(&[symbol])?;
                emitted += 1;
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    fn write_header(&mut self, vocabulary: &Vocabulary) -> Result<()> {
        self.sink.write_all(&self.original_size.to_ne_bytes())?;
        self.sink.write_all(&vocabulary.distinct_symbols().to_ne_bytes())?;
        for (symbol, frequency) in vocabulary.entries() {
            self.sink.write_all(&[symbol])?;
            self.sink.write_all(&frequency.to_ne_bytes())?;
        }
        self.header_size = 4 + 4 + vocabulary.distinct_symbols() * ENTRY_SIZE;
        Ok(())
    }

    fn read_vocabulary(&mut self) -> Result<Vocabulary> {
        let count = self.read_u32()?;
        let mut vocabulary = Vocabulary::empty();
        for _ in 0..count {
            let mut entry = [0u8; ENTRY_SIZE as usize];
            self.source.read_exact(&mut entry).map_err(ArchiveError::TruncatedArchive)?;
            let frequency = u32::from_ne_bytes([entry[1], entry[2], entry[3], entry[4]]);
            vocabulary.set_count(entry[0], frequency);
        }
        self.header_size = 4 + 4 + count * ENTRY_SIZE;
        Ok(vocabulary)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.source.read_exact(&mut bytes).map_err(ArchiveError::TruncatedArchive)?;
        Ok(u32::from_ne_bytes(bytes))
    }

    fn drain_full_bytes(&mut self, queue: &mut BitQueue) -> Result<()> {
        while let Some(byte) = queue.pack() {
            self.sink.write_all(&[byte])?;
            self.payload_size += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_bytes(data: &[u8]) -> (Vec<u8>, (u32, u32, u32)) {
        let mut archive = Vec::new();
        let mut archiver = Archiver::new(Cursor::new(data), &mut archive);
        archiver.encode().unwrap();
        let sizes = (archiver.original_size(), archiver.payload_size(), archiver.header_size());
        (archive, sizes)
    }

    fn decode_bytes(archive: &[u8]) -> Result<Vec<u8>> {
        let mut restored = Vec::new();
        let mut archiver = Archiver::new(Cursor::new(archive), &mut restored);
        archiver.decode()?;
        Ok(restored)
    }

    #[test]
    fn empty_input_produces_an_all_zero_header_and_no_payload() {
        let (archive, (original, payload, header)) = encode_bytes(&[]);
        assert_eq!(archive, vec![0u8; 8]);
        assert_eq!((original, payload, header), (0, 0, 8));
        assert_eq!(decode_bytes(&archive).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn six_repeats_of_one_byte_pack_into_one_payload_byte() {
        let (archive, (original, payload, header)) = encode_bytes(b"aaaaaa");
        assert_eq!((original, payload, header), (6, 1, 8 + 5));
        assert_eq!(archive.len(), 8 + 5 + 1);
        assert_eq!(decode_bytes(&archive).unwrap(), b"aaaaaa");
    }

    #[test]
    fn header_records_entries_in_ascending_symbol_order() {
        let (archive, _) = encode_bytes(b"cba");
        // original size, then vocabulary count
        assert_eq!(archive[0..4], 3u32.to_ne_bytes());
        assert_eq!(archive[4..8], 3u32.to_ne_bytes());
        assert_eq!(archive[8], b'a');
        assert_eq!(archive[13], b'b');
        assert_eq!(archive[18], b'c');
    }

    #[test]
    fn decode_restores_a_three_symbol_stream_exactly() {
        let mut data = Vec::new();
        data.extend(std::iter::repeat_n(b'a', 100));
        data.extend(std::iter::repeat_n(b'b', 200));
        data.extend(std::iter::repeat_n(b'c', 300));

        let (archive, (original, ..)) = encode_bytes(&data);
        assert_eq!(original, 600);
        assert_eq!(decode_bytes(&archive).unwrap(), data);
    }

    #[test]
    fn decode_reports_sizes_matching_the_encoder() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let (archive, (original, payload, header)) = encode_bytes(data);

        let mut restored = Vec::new();
        let mut archiver = Archiver::new(Cursor::new(&archive), &mut restored);
        archiver.decode().unwrap();
        assert_eq!(archiver.original_size(), original);
        assert_eq!(archiver.payload_size(), payload);
        assert_eq!(archiver.header_size(), header);
        assert_eq!(restored, data);
    }

    #[test]
    fn truncated_payload_fails_instead_of_emitting_short_output() {
        let (archive, _) = encode_bytes(b"mississippi river runs deep");
        let truncated = &archive[..archive.len() - 1];
        assert!(matches!(
            decode_bytes(truncated),
            Err(ArchiveError::TruncatedArchive(_))
        ));
    }

    #[test]
    fn truncated_header_fails_on_every_mandatory_field() {
        let (archive, _) = encode_bytes(b"abc");
        // inside original_size, inside vocabulary_count, inside an entry
        for cut in [2, 6, 10] {
            assert!(matches!(
                decode_bytes(&archive[..cut]),
                Err(ArchiveError::TruncatedArchive(_))
            ));
        }
    }

    #[test]
    fn payload_claiming_symbols_with_an_empty_vocabulary_is_rejected() {
        let mut forged = Vec::new();
        forged.extend(5u32.to_ne_bytes());
        forged.extend(0u32.to_ne_bytes());
        forged.push(0xff);
        assert!(matches!(decode_bytes(&forged), Err(ArchiveError::CorruptStream)));
    }
}
