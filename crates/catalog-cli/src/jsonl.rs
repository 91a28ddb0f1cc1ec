//! JSON Lines record streams for the CLI.
//!
//! Blank lines are ignored and malformed lines are logged and skipped, so a
//! single bad record never aborts a run.

use std::path::Path;

use anyhow::Context;
use catalog_core::Record;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};

pub(crate) type BoxedRead = Box<dyn AsyncRead + Unpin + Send>;
pub(crate) type BoxedWrite = Box<dyn AsyncWrite + Unpin + Send>;

pub(crate) struct RecordReader<R> {
    lines: Lines<BufReader<R>>,
    line_no: usize,
}

impl RecordReader<BoxedRead> {
    /// Opens `path`, or stdin when `None`.
    pub(crate) async fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let source: BoxedRead = match path {
            Some(path) => Box::new(
                tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open input {}", path.display()))?,
            ),
            None => Box::new(tokio::io::stdin()),
        };
        Ok(Self::new(source))
    }
}

impl<R: AsyncRead + Unpin> RecordReader<R> {
    pub(crate) fn new(source: R) -> Self {
        Self {
            lines: BufReader::new(source).lines(),
            line_no: 0,
        }
    }

    /// Returns the next parsed record with its 1-based line number.
    pub(crate) async fn next_record(&mut self) -> anyhow::Result<Option<(usize, Record)>> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .context("failed to read input")?
        {
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Record>(trimmed) {
                Ok(record) => return Ok(Some((self.line_no, record))),
                Err(e) => {
                    tracing::warn!(line = self.line_no, error = %e, "skipping malformed record");
                }
            }
        }
        Ok(None)
    }
}

pub(crate) struct RecordWriter<W> {
    sink: W,
}

impl RecordWriter<BoxedWrite> {
    /// Creates (truncating) `path`, or writes to stdout when `None`.
    pub(crate) async fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let sink: BoxedWrite = match path {
            Some(path) => Box::new(
                tokio::fs::File::create(path)
                    .await
                    .with_context(|| format!("failed to create output {}", path.display()))?,
            ),
            None => Box::new(tokio::io::stdout()),
        };
        Ok(Self::new(sink))
    }
}

impl<W: AsyncWrite + Unpin> RecordWriter<W> {
    pub(crate) fn new(sink: W) -> Self {
        Self { sink }
    }

    pub(crate) async fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.sink
            .write_all(&line)
            .await
            .context("failed to write record")?;
        Ok(())
    }

    /// Flushes buffered output and returns the sink.
    pub(crate) async fn finish(mut self) -> anyhow::Result<W> {
        self.sink.flush().await.context("failed to flush output")?;
        Ok(self.sink)
    }
}
