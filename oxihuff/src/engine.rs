//! File and stream entry points.
//!
//! Each call owns its tree and buffers for the duration of the call only.
//! Sources are read completely into memory, and outputs are produced in
//! memory before the destination file is created, so a failed call never
//! leaves a half-written output behind.

use crate::config::HuffmanConfig;
use crate::container::{Container, ContainerFormat};
use oxihuff_core::error::{OxiHuffError, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of one compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    /// Source size in bytes.
    pub input_len: u64,
    /// Container size in bytes.
    pub output_len: u64,
    /// Distinct byte values in the source.
    pub leaf_count: usize,
    /// Payload size in bits, excluding padding.
    pub bit_len: u64,
}

impl CompressStats {
    /// Container size relative to the source (`0.5` means half the size).
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        self.output_len as f64 / self.input_len as f64
    }
}

/// Compress `data` into a checked container.
///
/// # Example
///
/// ```rust
/// use oxihuff::{decode, encode};
///
/// let original = b"abracadabra";
/// let compressed = encode(original).unwrap();
/// assert_eq!(decode(&compressed).unwrap(), original);
/// ```
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    encode_with(data, &HuffmanConfig::DEFAULT)
}

/// Compress `data` into a container laid out per `config`.
pub fn encode_with(data: &[u8], config: &HuffmanConfig) -> Result<Vec<u8>> {
    Ok(Container::encode(data, config.format)?.to_bytes())
}

/// Decompress a container of either layout.
pub fn decode(container: &[u8]) -> Result<Vec<u8>> {
    Container::from_bytes(container)?.decode()
}

/// Compress everything `reader` yields and write the container to `writer`.
pub fn compress_to<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    config: &HuffmanConfig,
) -> Result<CompressStats> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    compress_bytes_to(&data, writer, config)
}

fn compress_bytes_to<W: Write>(
    data: &[u8],
    writer: &mut W,
    config: &HuffmanConfig,
) -> Result<CompressStats> {
    let (container, bit_len) = Container::encode_counting_bits(data, config.format)?;
    container.write_to(writer)?;
    writer.flush()?;

    Ok(CompressStats {
        input_len: data.len() as u64,
        output_len: container.encoded_len() as u64,
        leaf_count: container.leaf_count(),
        bit_len,
    })
}

/// Read a container from `reader`, decode it and write the original bytes.
///
/// Returns the number of bytes written.
pub fn decompress_to<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<u64> {
    let container = Container::read_from(reader)?;
    let data = container.decode()?;
    writer.write_all(&data)?;
    writer.flush()?;
    Ok(data.len() as u64)
}

/// Read a whole source file, mapping open failures and empty files.
fn read_source(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| OxiHuffError::source_not_found(path, e))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    if data.is_empty() {
        return Err(OxiHuffError::source_empty(path));
    }
    Ok(data)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Compress the file at `path` into its sibling container path.
///
/// Returns the path written.
pub fn compress_file(path: impl AsRef<Path>, config: &HuffmanConfig) -> Result<PathBuf> {
    let path = path.as_ref();
    let data = read_source(path)?;

    let mut encoded = Vec::new();
    let stats = compress_bytes_to(&data, &mut encoded, config)?;

    let output = config.compressed_path(path);
    write_output(&output, &encoded)?;

    info!(
        source = %path.display(),
        output = %output.display(),
        input_len = stats.input_len,
        output_len = stats.output_len,
        leaves = stats.leaf_count,
        ratio = stats.ratio(),
        "compressed"
    );
    Ok(output)
}

/// Decompress the container at `path` into its sibling output path.
///
/// Returns the path written.
pub fn decompress_file(path: impl AsRef<Path>, config: &HuffmanConfig) -> Result<PathBuf> {
    let path = path.as_ref();
    let bytes = read_source(path)?;

    let container = if config.require_magic {
        Container::read_checked(&mut bytes.as_slice())?
    } else {
        Container::from_bytes(&bytes)?
    };
    if container.format() == ContainerFormat::Legacy {
        info!(source = %path.display(), "container has no checksum; output is unverified");
    }
    let data = container.decode()?;

    let output = config.decompressed_path(path);
    write_output(&output, &data)?;

    info!(
        source = %path.display(),
        output = %output.display(),
        input_len = bytes.len(),
        output_len = data.len(),
        "decompressed"
    );
    Ok(output)
}

/// Compress `path` with the default configuration.
///
/// Returns `false` if the source cannot be opened, is empty, or any later
/// step fails; the error is logged.
pub fn compress(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match compress_file(path, &HuffmanConfig::DEFAULT) {
        Ok(_) => true,
        Err(e) => {
            warn!(source = %path.display(), error = %e, "compression failed");
            false
        }
    }
}

/// Decompress `path` with the default configuration.
///
/// Returns `false` if the container cannot be opened, is empty, or is
/// corrupt; the error is logged.
pub fn decompress(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match decompress_file(path, &HuffmanConfig::DEFAULT) {
        Ok(_) => true,
        Err(e) => {
            warn!(source = %path.display(), error = %e, "decompression failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode() {
        let original = b"in-memory round trip";
        let compressed = encode(original).unwrap();
        assert_eq!(&compressed[..4], b"OXHF");
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_encode_with_legacy() {
        let compressed = encode_with(b"aaab", &HuffmanConfig::LEGACY).unwrap();
        assert_eq!(compressed.len(), 16 + 5 + 1);
        assert_eq!(decode(&compressed).unwrap(), b"aaab");
    }

    #[test]
    fn test_stream_roundtrip() {
        let original = b"streams in, container out, and back again".to_vec();

        let mut container = Vec::new();
        let stats = compress_to(
            &mut Cursor::new(&original),
            &mut container,
            &HuffmanConfig::DEFAULT,
        )
        .unwrap();
        assert_eq!(stats.input_len, original.len() as u64);
        assert_eq!(stats.output_len, container.len() as u64);
        assert!(stats.ratio() > 0.0);

        let mut restored = Vec::new();
        let written = decompress_to(&mut Cursor::new(&container), &mut restored).unwrap();
        assert_eq!(written, original.len() as u64);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_stats_bit_len() {
        let mut out = Vec::new();
        let stats =
            compress_to(&mut Cursor::new(b"aaab"), &mut out, &HuffmanConfig::LEGACY).unwrap();
        assert_eq!(stats.bit_len, 4);
        assert_eq!(stats.leaf_count, 2);
    }

    #[test]
    fn test_compress_to_empty_reader() {
        let mut out = Vec::new();
        let err = compress_to(&mut Cursor::new(b""), &mut out, &HuffmanConfig::DEFAULT)
            .unwrap_err();
        assert!(matches!(err, OxiHuffError::EmptyInput));
        assert!(out.is_empty());
    }
}
