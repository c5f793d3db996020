use crate::connection::{LineSink, LineStream};
use crate::error::ChatError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Records every write; `transcript` joins them back into the byte stream
/// the peer would have seen.
#[derive(Clone, Default)]
pub(crate) struct MockSink {
    pub writes: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<Mutex<bool>>,
    pub fail_writes: bool,
}

impl MockSink {
    pub fn failing() -> Self {
        MockSink {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.writes.lock().unwrap().concat()
    }

    pub fn lines(&self) -> Vec<String> {
        self.transcript().lines().map(str::to_string).collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl LineSink for MockSink {
    async fn send_raw(&mut self, text: &str) -> Result<(), ChatError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone").into());
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ChatError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

/// Yields scripted lines, then either end-of-stream or a read error.
pub(crate) struct MockStream {
    lines: VecDeque<String>,
    fail_at_end: bool,
}

impl MockStream {
    pub fn new(lines: &[&str]) -> Self {
        MockStream {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            fail_at_end: false,
        }
    }

    pub fn failing_after(lines: &[&str]) -> Self {
        MockStream {
            fail_at_end: true,
            ..MockStream::new(lines)
        }
    }
}

#[async_trait]
impl LineStream for MockStream {
    async fn next_line(&mut self) -> Result<Option<String>, ChatError> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.fail_at_end => {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer").into())
            }
            None => Ok(None),
        }
    }
}
