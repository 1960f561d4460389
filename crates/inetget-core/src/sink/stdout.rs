use std::io::{self, Write as _};

use crate::error::{CoreError, Result};
use crate::sink::Sink;

/// Writes the transfer body straight to process standard output, for
/// `-o -` style usage. Never touches the filesystem.
#[derive(Default)]
pub struct StdOutSink {
    failed: bool,
}

impl StdOutSink {
    pub fn open() -> Result<Self> {
        Ok(Self { failed: false })
    }
}

impl Sink for StdOutSink {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        if let Err(e) = io::stdout().write_all(data) {
            self.failed = true;
            return Err(CoreError::WriteFailed(e.to_string()));
        }
        Ok(())
    }

    fn close(self: Box<Self>, _mtime: Option<i64>) -> Result<()> {
        io::stdout()
            .flush()
            .map_err(|e| CoreError::WriteFailed(e.to_string()))
    }

    fn abort(self: Box<Self>, _keep: bool) -> Result<()> {
        let _ = io::stdout().flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_succeeds() {
        assert!(StdOutSink::open().is_ok());
    }
}
