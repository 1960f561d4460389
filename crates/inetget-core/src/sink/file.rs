use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::sink::Sink;

/// Writes to a temporary file colocated with the target path, then
/// atomically renames over the target on success. On failure the temp
/// file is either deleted or kept as `<target>.partial`.
pub struct FileSink {
    target: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    failed: bool,
}

impl FileSink {
    /// Opens a temp file next to `target` (same directory, so the final
    /// rename is guaranteed to stay on one filesystem).
    pub fn open(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let file_name = target
            .file_name()
            .ok_or_else(|| CoreError::SinkOpenFailed("target path has no file name".into()))?;
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(".part");
        let temp_path = target
            .parent()
            .map(|dir| dir.join(&temp_name))
            .unwrap_or_else(|| PathBuf::from(&temp_name));

        let file = File::create(&temp_path)
            .map_err(|e| CoreError::SinkOpenFailed(format!("{}: {e}", temp_path.display())))?;

        Ok(Self {
            target,
            temp_path,
            file: Some(file),
            failed: false,
        })
    }
}

impl Sink for FileSink {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        let result = match &mut self.file {
            Some(f) => f.write_all(data),
            None => return Ok(()),
        };
        if let Err(e) = result {
            self.failed = true;
            return Err(CoreError::WriteFailed(e.to_string()));
        }
        Ok(())
    }

    fn close(mut self: Box<Self>, mtime: Option<i64>) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|e| CoreError::WriteFailed(e.to_string()))?;
        }
        if let Some(ts) = mtime {
            if ts != 0 {
                let mtime = filetime::FileTime::from_unix_time(ts, 0);
                let _ = filetime::set_file_mtime(&self.temp_path, mtime);
            }
        }
        std::fs::rename(&self.temp_path, &self.target)
            .map_err(|e| CoreError::WriteFailed(format!("rename into place: {e}")))?;
        Ok(())
    }

    fn abort(mut self: Box<Self>, keep: bool) -> Result<()> {
        drop(self.file.take());
        if keep {
            let partial = {
                let mut name = self.target.clone().into_os_string();
                name.push(".partial");
                PathBuf::from(name)
            };
            let _ = std::fs::rename(&self.temp_path, &partial);
        } else {
            let _ = std::fs::remove_file(&self.temp_path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_close_renames_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut sink = Box::new(FileSink::open(&target).unwrap());
        sink.write(b"hello").unwrap();
        sink.close(None).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn abort_without_keep_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut sink = Box::new(FileSink::open(&target).unwrap());
        sink.write(b"partial").unwrap();
        let temp_path = sink.temp_path.clone();
        sink.abort(false).unwrap();
        assert!(!temp_path.exists());
        assert!(!target.exists());
    }

    #[test]
    fn abort_with_keep_renames_to_partial() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut sink = Box::new(FileSink::open(&target).unwrap());
        sink.write(b"partial").unwrap();
        sink.abort(true).unwrap();
        let mut partial = target.clone().into_os_string();
        partial.push(".partial");
        assert!(PathBuf::from(partial).exists());
    }
}
