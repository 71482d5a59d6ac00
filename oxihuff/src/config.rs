//! Compressor configuration.

use crate::container::ContainerFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings for file compression and decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanConfig {
    /// Layout written by the compressor.
    pub format: ContainerFormat,
    /// Reject containers without the magic header when decompressing.
    pub require_magic: bool,
    /// Appended to the source path to name the compressed file.
    pub compressed_suffix: &'static str,
    /// Appended to the container path to name the decompressed file.
    pub decompressed_suffix: &'static str,
}

impl HuffmanConfig {
    /// Checked container with magic, version and CRC-32; reads both layouts.
    pub const DEFAULT: Self = Self {
        format: ContainerFormat::Checked,
        require_magic: false,
        compressed_suffix: ".compressed.huffman",
        decompressed_suffix: ".decompressed.txt",
    };

    /// Bare `numLeaf | numChar | tree | payload` layout with 64-bit counters.
    pub const LEGACY: Self = Self {
        format: ContainerFormat::Legacy,
        ..Self::DEFAULT
    };

    /// Checked container, and refuse anything without the magic header.
    pub const STRICT: Self = Self {
        require_magic: true,
        ..Self::DEFAULT
    };

    /// Use a different container layout.
    pub fn with_format(mut self, format: ContainerFormat) -> Self {
        self.format = format;
        self
    }

    /// Use different output suffixes.
    pub fn with_suffixes(mut self, compressed: &'static str, decompressed: &'static str) -> Self {
        self.compressed_suffix = compressed;
        self.decompressed_suffix = decompressed;
        self
    }

    /// Sibling path the compressed output of `source` is written to.
    pub fn compressed_path(&self, source: &Path) -> PathBuf {
        append_suffix(source, self.compressed_suffix)
    }

    /// Sibling path the decompressed output of `container` is written to.
    pub fn decompressed_path(&self, container: &Path) -> PathBuf {
        append_suffix(container, self.decompressed_suffix)
    }
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HuffmanConfig::default();
        assert_eq!(config, HuffmanConfig::DEFAULT);
        assert_eq!(config.format, ContainerFormat::Checked);
        assert!(!config.require_magic);
    }

    #[test]
    fn test_presets() {
        assert_eq!(HuffmanConfig::LEGACY.format, ContainerFormat::Legacy);
        assert!(HuffmanConfig::STRICT.require_magic);
        assert_eq!(HuffmanConfig::STRICT.format, ContainerFormat::Checked);
    }

    #[test]
    fn test_sibling_paths() {
        let config = HuffmanConfig::DEFAULT;
        assert_eq!(
            config.compressed_path(Path::new("data/notes.txt")),
            PathBuf::from("data/notes.txt.compressed.huffman")
        );
        assert_eq!(
            config.decompressed_path(Path::new("data/notes.huffman")),
            PathBuf::from("data/notes.huffman.decompressed.txt")
        );
    }

    #[test]
    fn test_builders() {
        let config = HuffmanConfig::DEFAULT
            .with_format(ContainerFormat::Legacy)
            .with_suffixes(".hf", ".out");
        assert_eq!(config.format, ContainerFormat::Legacy);
        assert_eq!(
            config.compressed_path(Path::new("a.bin")),
            PathBuf::from("a.bin.hf")
        );
        assert_eq!(
            config.decompressed_path(Path::new("a.bin.hf")),
            PathBuf::from("a.bin.hf.out")
        );
    }
}
