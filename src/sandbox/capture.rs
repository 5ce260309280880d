//! Bounded capture of one child pipe

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 8192;

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: bool,
}

impl Captured {
    /// Keep at most `limit` bytes; the rest is dropped
    fn push(&mut self, data: &[u8], limit: usize) {
        let room = limit.saturating_sub(self.bytes.len());
        if data.len() > room {
            self.truncated = true;
        }
        self.bytes.extend_from_slice(&data[..data.len().min(room)]);
    }
}

fn lock(buffer: &Mutex<Captured>) -> MutexGuard<'_, Captured> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decoded output of one stream
#[derive(Debug, Default)]
pub(crate) struct CapturedText {
    pub text: String,
    pub truncated: bool,
}

/// Reads a pipe to EOF on a background task
///
/// Bytes land in a shared buffer as they arrive, so whatever was read
/// before the child was killed is still there if the reader never
/// reaches EOF.
pub(crate) struct StreamCapture {
    buffer: Arc<Mutex<Captured>>,
    task: JoinHandle<()>,
}

impl StreamCapture {
    pub fn spawn<R>(reader: Option<R>, limit: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Captured::default()));
        let sink = Arc::clone(&buffer);
        let task = tokio::spawn(async move {
            let Some(mut reader) = reader else {
                return;
            };
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        lock(&sink).push(&chunk[..n], limit);
                    }
                    Err(err) => {
                        debug!(%err, "pipe read failed");
                        break;
                    }
                }
            }
        });
        Self { buffer, task }
    }

    /// Wait up to `grace` for EOF, then decode what was captured
    pub async fn finish(mut self, grace: Duration) -> CapturedText {
        if timeout(grace, &mut self.task).await.is_err() {
            // A grandchild may still hold the write end open.
            warn!(grace_ms = grace.as_millis() as u64, "pipe still open after drain grace, keeping partial output");
            self.task.abort();
        }
        let captured = std::mem::take(&mut *lock(&self.buffer));
        if captured.truncated {
            warn!(kept = captured.bytes.len(), "output limit reached, excess dropped");
        }
        CapturedText {
            text: String::from_utf8_lossy(&captured.bytes).into_owned(),
            truncated: captured.truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_respects_limit() {
        let mut captured = Captured::default();
        captured.push(b"hello", 8);
        assert!(!captured.truncated);
        captured.push(b"world", 8);
        assert_eq!(captured.bytes, b"hellowor");
        assert!(captured.truncated);
        captured.push(b"!", 8);
        assert_eq!(captured.bytes.len(), 8);
    }

    #[tokio::test]
    async fn test_reads_to_eof_and_decodes_lossily() {
        let data: &[u8] = b"ok \xff done";
        let capture = StreamCapture::spawn(Some(data), 1024);
        let text = capture.finish(Duration::from_secs(1)).await;
        assert_eq!(text.text, "ok \u{FFFD} done");
        assert!(!text.truncated);
    }

    #[tokio::test]
    async fn test_missing_pipe_is_empty() {
        let capture = StreamCapture::spawn(None::<&[u8]>, 1024);
        let text = capture.finish(Duration::from_secs(1)).await;
        assert!(text.text.is_empty());
    }

    #[tokio::test]
    async fn test_open_pipe_keeps_partial_output() {
        let (mut writer, reader) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut writer, b"partial").await.unwrap();
        let capture = StreamCapture::spawn(Some(reader), 1024);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The writer is still alive, so EOF never comes.
        let text = capture.finish(Duration::from_millis(50)).await;
        assert_eq!(text.text, "partial");
        drop(writer);
    }
}
