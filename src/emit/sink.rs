//! Output sinks for generated text.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destination for rendered output lines.
///
/// Sinks are plain byte pipes; emitters own all formatting.
pub trait OutputSink {
    fn write_str(&mut self, data: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write_str(&mut self, data: &str) -> io::Result<()> {
        (**self).write_str(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Buffered file sink.
///
/// The file is created (truncated) on construction and flushed either
/// explicitly through `OutputSink::flush` or on drop.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl OutputSink for FileSink {
    fn write_str(&mut self, data: &str) -> io::Result<()> {
        self.writer.write_all(data.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Sink that prints to stdout
#[derive(Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for ConsoleSink {
    fn write_str(&mut self, data: &str) -> io::Result<()> {
        io::stdout().write_all(data.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// In-memory sink for tests and inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    contents: String,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl OutputSink for MemorySink {
    fn write_str(&mut self, data: &str) -> io::Result<()> {
        self.contents.push_str(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
