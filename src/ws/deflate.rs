use std::io::{Read, Write};

/// The only extension offer this server makes or accepts.
pub(crate) static EXTENSIONS_HEADER_VALUE: &str =
    "permessage-deflate; server_no_context_takeover; client_no_context_takeover";

pub trait CompressWriter: Write {
    fn finish(&mut self) -> std::io::Result<()>;
}

pub struct DeflateWriter<W: Write> {
    raw: flate2::write::DeflateEncoder<W>,
}

impl<W: Write> DeflateWriter<W> {
    #[inline(always)]
    pub fn new(w: W) -> Self {
        Self {
            raw: flate2::write::DeflateEncoder::new(w, flate2::Compression::default()),
        }
    }

    #[inline(always)]
    pub fn with_level(w: W, level: flate2::Compression) -> Self {
        Self {
            raw: flate2::write::DeflateEncoder::new(w, level),
        }
    }
}

impl<W: Write> Write for DeflateWriter<W> {
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.raw.write(buf)
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        self.raw.flush()
    }
}

impl<W: Write> CompressWriter for DeflateWriter<W> {
    #[inline(always)]
    fn finish(&mut self) -> std::io::Result<()> {
        self.raw.try_finish()
    }
}

pub type CompressFactory =
    fn(Box<dyn Write + Send>, flate2::Compression) -> Box<dyn CompressWriter + Send>;

pub type DecompressFactory = fn(Box<dyn Read + Send>) -> Box<dyn Read + Send>;

/// Builds the per-message compressor for a no-context-takeover session.
pub fn compress_no_context_takeover(
    w: Box<dyn Write + Send>,
    level: flate2::Compression,
) -> Box<dyn CompressWriter + Send> {
    Box::new(DeflateWriter::with_level(w, level))
}

/// Builds the per-message decompressor for a no-context-takeover session.
pub fn decompress_no_context_takeover(r: Box<dyn Read + Send>) -> Box<dyn Read + Send> {
    Box::new(flate2::read::DeflateDecoder::new(r))
}
