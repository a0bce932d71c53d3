//! Decoded directory entries.

use getdents_abi::{DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DT_UNKNOWN};

/// Kind of a directory entry, as reported by the `d_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// The filesystem did not report a type
    Unknown,
    Fifo,
    CharDevice,
    Dir,
    BlockDevice,
    File,
    Symlink,
    Socket,
}

impl FileType {
    /// Map a raw `d_type` tag. Tags outside the known set map to `Unknown`.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            DT_FIFO => FileType::Fifo,
            DT_CHR => FileType::CharDevice,
            DT_DIR => FileType::Dir,
            DT_BLK => FileType::BlockDevice,
            DT_REG => FileType::File,
            DT_LNK => FileType::Symlink,
            DT_SOCK => FileType::Socket,
            _ => FileType::Unknown,
        }
    }

    /// The raw `d_type` tag for this kind.
    pub fn tag(self) -> u8 {
        match self {
            FileType::Unknown => DT_UNKNOWN,
            FileType::Fifo => DT_FIFO,
            FileType::CharDevice => DT_CHR,
            FileType::Dir => DT_DIR,
            FileType::BlockDevice => DT_BLK,
            FileType::File => DT_REG,
            FileType::Symlink => DT_LNK,
            FileType::Socket => DT_SOCK,
        }
    }
}

/// One directory entry: inode, type tag, and the raw name bytes.
///
/// The name is exactly what the kernel stored. No decoding is applied, so
/// names that are not valid UTF-8 come back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    /// Inode number
    pub inode: u64,
    /// Raw `d_type` tag (see [`FileType::from_tag`])
    pub type_tag: u8,
    /// Entry name, without the NUL terminator or padding
    pub name: Vec<u8>,
}

impl DirEntry {
    pub fn file_type(&self) -> FileType {
        FileType::from_tag(self.type_tag)
    }

    pub fn is_dir(&self) -> bool {
        self.type_tag == DT_DIR
    }

    pub fn is_file(&self) -> bool {
        self.type_tag == DT_REG
    }

    pub fn is_symlink(&self) -> bool {
        self.type_tag == DT_LNK
    }

    pub fn is_fifo(&self) -> bool {
        self.type_tag == DT_FIFO
    }

    pub fn is_socket(&self) -> bool {
        self.type_tag == DT_SOCK
    }

    pub fn is_block_device(&self) -> bool {
        self.type_tag == DT_BLK
    }

    pub fn is_char_device(&self) -> bool {
        self.type_tag == DT_CHR
    }

    /// Whether the filesystem left the type unreported. Callers that need the
    /// real kind have to `lstat` the entry themselves.
    pub fn is_unknown(&self) -> bool {
        self.file_type() == FileType::Unknown
    }

    /// Whether this is the `.` or `..` entry.
    pub fn is_dot(&self) -> bool {
        self.name == b"." || self.name == b".."
    }

    /// The name as an `OsStr`, without copying.
    #[cfg(unix)]
    pub fn name_os(&self) -> &std::ffi::OsStr {
        use std::os::unix::ffi::OsStrExt;
        std::ffi::OsStr::from_bytes(&self.name)
    }

    /// Split into `(inode, type_tag, name)`.
    pub fn into_parts(self) -> (u64, u8, Vec<u8>) {
        (self.inode, self.type_tag, self.name)
    }
}
