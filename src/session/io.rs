//! Byte streams handed to sessions and commands.
//!
//! Both stream types are cheap to clone and safe to share between the
//! session loop and the commands it runs.

use std::io::{self, BufRead, BufReader, Cursor, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A shared, line-oriented output sink.
#[derive(Clone)]
pub struct OutputStream {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    crlf: bool,
}

impl OutputStream {
    /// Wraps any writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            crlf: false,
        }
    }

    /// Standard output of the process.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Standard error of the process.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// An in-memory sink, plus a handle for reading back what was written.
    pub fn memory() -> (Self, MemoryBuffer) {
        let buffer = MemoryBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Returns a stream sharing the same sink that writes `\r\n` for every
    /// bare `\n`. Raw-mode terminals need this.
    pub fn with_crlf(&self, crlf: bool) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            crlf,
        }
    }

    /// Returns true if newlines are translated.
    pub fn is_crlf(&self) -> bool {
        self.crlf
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes text without a trailing newline.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut sink = self.lock();
        if !self.crlf {
            return sink.write_all(text.as_bytes());
        }
        let mut prev = '\0';
        let mut translated = String::with_capacity(text.len() + 8);
        for c in text.chars() {
            if c == '\n' && prev != '\r' {
                translated.push('\r');
            }
            translated.push(c);
            prev = c;
        }
        sink.write_all(translated.as_bytes())
    }

    /// Writes text followed by a newline.
    pub fn println(&self, text: &str) -> io::Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        self.write_str(&line)
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("crlf", &self.crlf)
            .finish_non_exhaustive()
    }
}

/// Growable in-memory byte buffer usable as an [`OutputStream`] sink.
#[derive(Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A shared, line-oriented input source.
#[derive(Clone)]
pub struct InputStream {
    source: Arc<Mutex<Box<dyn BufRead + Send>>>,
}

impl InputStream {
    /// Wraps any buffered reader.
    pub fn new(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            source: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    /// Standard input of the process.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }

    /// Input that yields the given text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into().into_bytes()))
    }

    /// Input that is already at end of file.
    pub fn empty() -> Self {
        Self::new(io::empty())
    }

    /// Reads one line without its terminator. `None` at end of input.
    ///
    /// Blocks the calling thread.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut source = self.source.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut line = String::new();
        if source.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

impl std::fmt::Debug for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStream").finish_non_exhaustive()
    }
}
