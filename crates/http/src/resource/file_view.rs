use std::fs::File;
use std::io;

use memmap2::{Mmap, MmapOptions};

/// Read-only, zero-copy view of a file's contents.
///
/// The mapping is released when the view is dropped, which happens when the
/// response finished sending or the connection is closed. The file descriptor
/// it was created from may be closed right after construction.
#[derive(Debug, Default)]
pub struct FileView {
    map: Option<Mmap>,
}

impl FileView {
    /// A view of nothing, used for zero length files which can't be mapped.
    pub fn empty() -> Self {
        Self { map: None }
    }

    /// Maps the first `len` bytes of `file`.
    pub(crate) fn map(file: &File, len: u64) -> io::Result<Self> {
        if len == 0 {
            return Ok(Self::empty());
        }

        let len = usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        // SAFETY: the mapping is private and read-only. Files under the document root
        // must not be truncated while they are served, otherwise reads of the vanished
        // pages fault. That is the same contract any mmap based file server has.
        let map = unsafe { MmapOptions::new().len(len).map(file)? };
        Ok(Self { map: Some(map) })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_file_contents() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"0123456789").unwrap();

        let view = FileView::map(&file, 10).unwrap();
        drop(file);

        assert_eq!(view.len(), 10);
        assert_eq!(view.as_bytes(), b"0123456789");
    }

    #[test]
    fn zero_length_is_empty() {
        let file = tempfile::tempfile().unwrap();
        let view = FileView::map(&file, 0).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.as_bytes(), b"");
    }
}
