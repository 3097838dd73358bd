//! Opening plain or gzip-compressed text inputs.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a file for line reading, transparently decompressing gzip content.
///
/// Compression is detected from the magic bytes rather than the extension.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)
        .map_err(|e| Error::Parse(format!("failed to open {}: {e}", path.display())))?;
    text_reader(file)
}

/// Wrap any reader, decompressing when it starts with the gzip magic bytes.
pub fn text_reader<R: Read + 'static>(reader: R) -> Result<Box<dyn BufRead>, Error> {
    let mut buffered = BufReader::new(reader);
    let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(buffered))))
    } else {
        Ok(Box::new(buffered))
    }
}

#[cfg(test)]
pub(crate) fn gzip(content: &[u8]) -> Vec<u8> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read_all(mut reader: Box<dyn BufRead>) -> String {
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn plain_text_passes_through() {
        let reader = text_reader(Cursor::new(b"line1\nline2\n".to_vec())).unwrap();
        assert_eq!(read_all(reader), "line1\nline2\n");
    }

    #[test]
    fn gzip_is_detected() {
        let reader = text_reader(Cursor::new(gzip(b">a\nACGT\n"))).unwrap();
        assert_eq!(read_all(reader), ">a\nACGT\n");
    }

    #[test]
    fn empty_input() {
        let reader = text_reader(Cursor::new(Vec::new())).unwrap();
        assert_eq!(read_all(reader), "");
    }

    #[test]
    fn open_gz_file_without_extension() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&gzip(b"hello\n")).unwrap();
        let reader = open_text(f.path()).unwrap();
        assert_eq!(read_all(reader), "hello\n");
    }

    #[test]
    fn missing_file() {
        let err = open_text(Path::new("/nonexistent/prosite.dat")).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/prosite.dat"));
    }
}
