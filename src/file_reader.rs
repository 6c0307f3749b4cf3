//! Table file acquisition with transparent gzip decompression
//!
//! Range tables are distributed both as plain CSV and as `.csv.gz`. Gzip
//! input is recognised by its magic bytes rather than the file name, so a
//! renamed archive still loads. The special path `-` reads from stdin.
//!
//! ```rust,no_run
//! use ipgeo::file_reader;
//! use std::io::BufRead;
//!
//! let reader = file_reader::open("IP2LOCATION-LITE-DB1.CSV.gz")?;
//! for line in reader.lines() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{GeoError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for table reads (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a table file for reading
///
/// The file handle is owned by the returned reader and released when the
/// reader is dropped, including on early return from a failed parse.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return wrap(stdin().lock()).map_err(|e| GeoError::Io(format!("<stdin>: {}", e)));
    }

    let file = File::open(path).map_err(|e| GeoError::Io(format!("{}: {}", path.display(), e)))?;
    wrap(file).map_err(|e| GeoError::Io(format!("{}: {}", path.display(), e)))
}

/// Buffer a reader, inserting a gzip decoder if the stream starts with the gzip magic
pub fn wrap<R: Read + 'static>(inner: R) -> io::Result<Box<dyn BufRead>> {
    let mut buffered = BufReader::with_capacity(BUFFER_SIZE, inner);
    let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        let decoder = MultiGzDecoder::new(buffered);
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(buffered))
    }
}
