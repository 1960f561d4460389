use crate::error::Result;
use crate::sink::Sink;

/// Accepts and counts writes without performing any I/O. Used by tests and
/// by `--range`-probing dry runs.
#[derive(Default)]
pub struct NullSink {
    pub bytes_written: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for NullSink {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    fn close(self: Box<Self>, _mtime: Option<i64>) -> Result<()> {
        Ok(())
    }

    fn abort(self: Box<Self>, _keep: bool) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_bytes_without_io() {
        let mut sink = NullSink::new();
        sink.write(b"12345").unwrap();
        sink.write(b"67").unwrap();
        assert_eq!(sink.bytes_written, 7);
    }
}
