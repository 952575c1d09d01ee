use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::encode::encode_len;
use crate::error::DumpError;

const INITIAL_CAPACITY: usize = 4096;

/// In-memory, write-only sink buffering one chunk's payload. `finish`
/// appends the complete `[magic][length][payload]` record to a container,
/// which may itself be another `ChunkWriter` — that is how nested chunks
/// compose.
pub struct ChunkWriter {
    magic: u32,
    payload: Vec<u8>,
}

impl ChunkWriter {
    pub fn new(magic: u32) -> Self {
        Self {
            magic,
            payload: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    // Grow by at least half the current capacity, or to the requested
    // size, whichever is larger. Never shrinks.
    fn reserve_for(&mut self, extra: usize) {
        let needed = self.payload.len() + extra;
        if needed <= self.payload.capacity() {
            return;
        }

        let grown = (self.payload.capacity() + self.payload.capacity() / 2)
            .max(needed)
            .max(INITIAL_CAPACITY);
        self.payload.reserve_exact(grown - self.payload.len());
    }

    /// Seal the chunk and append its record to `container`. Returns the
    /// record's total size: the payload plus the 8 byte chunk header.
    pub fn finish<W: Write + ?Sized>(self, container: &mut W) -> Result<usize, DumpError> {
        container.write_u32::<LittleEndian>(self.magic)?;
        encode_len(container, self.payload.len())?;
        container.write_all(&self.payload)?;

        Ok(8 + self.payload.len())
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.reserve_for(buf.len());
        self.payload.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Scope a child chunk over `f`: the record is flushed into `container`
/// when `f` returns successfully. On error nothing is emitted — the whole
/// dump aborts, so a half-built chunk must never reach the container.
pub fn chunk<W, F>(container: &mut W, magic: u32, f: F) -> Result<(), DumpError>
where
    W: Write + ?Sized,
    F: FnOnce(&mut ChunkWriter) -> Result<(), DumpError>,
{
    let mut writer = ChunkWriter::new(magic);
    f(&mut writer)?;
    writer.finish(container)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ReadBytesExt;
    use std::io::Cursor;

    #[test]
    fn record_length_matches_payload() {
        let mut container = Vec::new();
        chunk(&mut container, 0x1234, |out| {
            out.write_all(b"payload")?;
            Ok(())
        })
        .unwrap();

        let mut cursor = Cursor::new(&container);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 7);
        assert_eq!(&container[8..], b"payload");
    }

    #[test]
    fn empty_chunk_is_a_bare_header() {
        let mut container = Vec::new();
        chunk(&mut container, 0xabcd, |_| Ok(())).unwrap();

        assert_eq!(container.len(), 8);
        assert_eq!(&container[4..8], &0u32.to_le_bytes());
    }

    #[test]
    fn nested_chunks_compose() {
        let mut container = Vec::new();
        chunk(&mut container, 1, |parent| {
            parent.write_all(&[0xaa])?;
            chunk(parent, 2, |child| {
                child.write_all(&[0xbb, 0xbb])?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

        // Parent payload: 1 direct byte + complete child record (8 + 2).
        let mut cursor = Cursor::new(&container);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 1);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 11);
        assert_eq!(container[8], 0xaa);
        assert_eq!(&container[9..13], &2u32.to_le_bytes());
        assert_eq!(&container[13..17], &2u32.to_le_bytes());
        assert_eq!(&container[17..], &[0xbb, 0xbb]);
        assert_eq!(container.len(), 8 + 11);
    }

    #[test]
    fn error_in_scope_emits_nothing() {
        let mut container = Vec::new();
        let result = chunk(&mut container, 9, |out| {
            out.write_all(&[1, 2, 3])?;
            Err(DumpError::IntegerOverflow)
        });

        assert!(result.is_err());
        assert!(container.is_empty());
    }

    #[test]
    fn buffer_growth_is_geometric() {
        let mut writer = ChunkWriter::new(0);
        writer.write_all(&[0; 10]).unwrap();
        let initial = writer.payload.capacity();
        assert!(initial >= INITIAL_CAPACITY);

        writer.write_all(&vec![0; initial]).unwrap();
        assert!(writer.payload.capacity() >= initial + initial / 2);
    }
}
