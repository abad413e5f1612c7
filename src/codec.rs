use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// Re-encodes a byte stream in a legacy charset as UTF-8 chunks.
pub struct Utf8Transcoder {
    decoder: encoding_rs::Decoder,
    flushed: bool,
}

impl Utf8Transcoder {
    pub fn new(encoding: &'static encoding_rs::Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
            flushed: false,
        }
    }

    /// Decodes as much of `src` as fits; returns bytes consumed and the UTF-8 produced.
    fn transcode(&mut self, src: &[u8], last: bool) -> (usize, BytesMut) {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(src.len())
            .unwrap_or_else(|| src.len() * 3 + 16);
        let mut out = vec![0; capacity];
        let (_result, read, written, _replaced) = self.decoder.decode_to_utf8(src, &mut out, last);
        out.truncate(written);
        (read, BytesMut::from(&out[..]))
    }
}

impl Decoder for Utf8Transcoder {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let (read, out) = self.transcode(src, false);
        src.advance(read);
        // a split multi-byte sequence is held by the decoder until more input arrives
        Ok((!out.is_empty()).then_some(out))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.flushed {
            return Ok(None);
        }
        self.flushed = true;
        let (_read, out) = self.transcode(buf, true);
        buf.clear();
        Ok((!out.is_empty()).then_some(out))
    }
}
