//! Type-tag based filtering of listed entries.

use getdents::{DirEntry, FileType};

/// Kinds of entry to leave out of the listing.
///
/// Filtering looks at the `d_type` tag only. Entries whose type the
/// filesystem did not report are never filtered out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFilter {
    pub no_files: bool,
    pub no_dirs: bool,
    pub no_symlinks: bool,
    pub no_sockets: bool,
    pub no_block_devices: bool,
    pub no_char_devices: bool,
    pub no_fifos: bool,
}

impl TypeFilter {
    /// Whether `entry` should be left out.
    pub fn excludes(&self, entry: &DirEntry) -> bool {
        match entry.file_type() {
            FileType::File => self.no_files,
            FileType::Dir => self.no_dirs,
            FileType::Symlink => self.no_symlinks,
            FileType::Socket => self.no_sockets,
            FileType::BlockDevice => self.no_block_devices,
            FileType::CharDevice => self.no_char_devices,
            FileType::Fifo => self.no_fifos,
            FileType::Unknown => false,
        }
    }
}
