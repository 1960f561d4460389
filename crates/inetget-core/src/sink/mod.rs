//! Output sinks (spec §4.2): where received bytes are written.

mod file;
mod null;
mod stdout;

pub use file::FileSink;
pub use null::NullSink;
pub use stdout::StdOutSink;

use crate::error::Result;

/// Destination for the bytes a client produces. Implementors own their
/// buffering; `write` may be called many times per transfer.
pub trait Sink: Send {
    /// Append bytes to the sink.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Finalize a successful transfer: flush, make any temp file visible,
    /// and apply `mtime` when `Some` and the caller requested it.
    fn close(self: Box<Self>, mtime: Option<i64>) -> Result<()>;

    /// Finalize a failed or aborted transfer. `keep` mirrors the
    /// `--keep-failed` flag: when true, partial output is preserved
    /// (renamed into place or left as a `.partial` file depending on the
    /// sink); when false, it is discarded.
    fn abort(self: Box<Self>, keep: bool) -> Result<()>;
}
