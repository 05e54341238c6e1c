//! Fixed-size chunker for splitting data into content-addressed chunks.

use silt_types::ChunkId;
use tokio::io::AsyncRead;

use crate::error::CasError;

/// A single chunk of data with its content-addressed ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Content-addressed identifier: `blake3(data)`.
    pub id: ChunkId,
    /// Zero-based position within the original stream.
    pub index: u32,
    /// The raw chunk data.
    pub data: Vec<u8>,
}

/// Fixed-size chunker that splits data into chunks of a configured size.
///
/// The last chunk may be smaller than `chunk_size`.
/// Empty data produces zero chunks; no empty chunk is ever emitted.
pub struct Chunker {
    chunk_size: u32,
}

impl Chunker {
    /// Create a new chunker with the given chunk size in bytes.
    pub fn new(chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "chunk size must be at least 1 byte");
        Self { chunk_size }
    }

    /// The configured chunk size in bytes.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Split an in-memory buffer into fixed-size chunks.
    ///
    /// Each chunk's ID is the BLAKE3 hash of its data.
    /// Returns an empty vec for empty input.
    pub fn chunk(&self, data: &[u8]) -> Vec<Chunk> {
        if data.is_empty() {
            return Vec::new();
        }

        let chunk_size = self.chunk_size as usize;
        let mut chunks = Vec::new();

        for (index, slice) in data.chunks(chunk_size).enumerate() {
            let id = ChunkId::from_data(slice);
            chunks.push(Chunk {
                id,
                index: index as u32,
                data: slice.to_vec(),
            });
        }

        chunks
    }

    /// Read the next window from `reader`, filling up to `chunk_size` bytes.
    ///
    /// Returns `None` at end of stream. A short final window is returned
    /// as-is; a zero-length read loop result terminates the stream and is
    /// never surfaced as a chunk.
    pub async fn next_window(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<Option<Vec<u8>>, CasError> {
        use tokio::io::AsyncReadExt;

        let chunk_size = self.chunk_size as usize;
        let mut buf = vec![0u8; chunk_size];
        let mut filled = 0;

        // Fill the window completely, or stop at EOF.
        while filled < chunk_size {
            let n = reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }

        buf.truncate(filled);
        Ok(Some(buf))
    }

    /// Split data from an async reader into fixed-size chunks.
    ///
    /// Reads the entire stream, producing chunks as it goes.
    pub async fn chunk_stream(
        &self,
        mut reader: impl AsyncRead + Unpin,
    ) -> Result<Vec<Chunk>, CasError> {
        let mut chunks = Vec::new();
        let mut index = 0u32;

        while let Some(window) = self.next_window(&mut reader).await? {
            let id = ChunkId::from_data(&window);
            chunks.push(Chunk {
                id,
                index,
                data: window,
            });
            index += 1;
        }

        Ok(chunks)
    }
}
