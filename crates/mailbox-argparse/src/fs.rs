use std::io::{self, Read};
use std::path::Path;

/// The file-system access the parser needs: existence checks for
/// [`Shape::Directory`](crate::Shape::Directory) / [`Shape::File`](crate::Shape::File)
/// values and reading args files.
pub trait FileSystem {
    fn is_dir(&self, path: &str) -> bool;
    fn is_file(&self, path: &str) -> bool;
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn is_file(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(io::BufReader::new(file)))
    }
}
