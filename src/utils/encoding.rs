use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::warn;

use crate::error::Result;

/// Decode raw bytes as UTF-8, dropping a leading BOM and replacing malformed
/// sequences rather than failing the whole file.
pub fn decode_text<'a>(bytes: &'a [u8], origin: &Path) -> Cow<'a, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        warn!(
            "{} contains invalid UTF-8; malformed bytes were replaced",
            origin.display()
        );
    }
    text
}

/// Read a whole file into a decoded string through a memory map
pub fn read_text_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }

    let mmap = unsafe { Mmap::map(&file)? };
    Ok(decode_text(&mmap, path).into_owned())
}
