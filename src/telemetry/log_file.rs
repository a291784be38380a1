use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Default size cap for the debug log file.
pub const LOG_FILE_MAX_LENGTH: u64 = 20_000;

pub const CRLF: &str = "\r\n";

/// Append-only debug log file with a hard size cap.
///
/// A write that would push the file past `max_bytes` truncates it first, so
/// the file always holds the most recent writes and never grows unbounded.
/// Lines are terminated with CRLF.
#[derive(Debug, Clone)]
pub struct CappedLogFile {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    max_bytes: u64,
    lock: Mutex<()>,
}

impl CappedLogFile {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                max_bytes,
                lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.inner.max_bytes
    }

    /// Append one tagged line.
    pub fn write_log(&self, tag: &str, message: &str) -> io::Result<()> {
        let line = if tag.is_empty() {
            format!("{}{}", message, CRLF)
        } else {
            format!("[{}] {}{}", tag, message, CRLF)
        };
        self.append(line.as_bytes())
    }

    /// Append an error and its `source()` chain, one CRLF line per cause.
    pub fn write_error(
        &self,
        tag: &str,
        err: &(dyn std::error::Error + 'static),
    ) -> io::Result<()> {
        let mut text = if tag.is_empty() {
            format!("{}{}", err, CRLF)
        } else {
            format!("[{}] {}{}", tag, err, CRLF)
        };
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(&format!("    caused by: {}{}", cause, CRLF));
            source = cause.source();
        }
        self.append(text.as_bytes())
    }

    /// Append raw bytes, restarting the file when the cap would be exceeded.
    pub fn append(&self, data: &[u8]) -> io::Result<()> {
        let _guard = self
            .inner
            .lock
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;

        let current = match std::fs::metadata(&self.inner.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        let restart = current + data.len() as u64 > self.inner.max_bytes;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!restart)
            .truncate(restart)
            .open(&self.inner.path)?;
        file.write_all(data)?;
        file.flush()
    }
}

/// Rewrite bare `\n` line endings as CRLF.
fn to_crlf(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len() + 8);
    let mut prev = 0u8;
    for &b in buf {
        if b == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        out.push(b);
        prev = b;
    }
    out
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(&to_crlf(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CappedLogFile {
    type Writer = CappedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
