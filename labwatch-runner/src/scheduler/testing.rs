//! Scripted repositories for scheduler tests

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use labwatch_client::ClientError;
use labwatch_core::domain::analysis::{Analysis, AnalysisStatus, Endpoint, Grade};
use labwatch_core::dto::notification::Message;
use tokio::time::Instant;

use crate::repository::{Delivery, Notifier, ScanRepository};

pub fn analysis(host: &str, status: AnalysisStatus) -> Analysis {
    Analysis {
        host: host.to_string(),
        status,
        status_message: None,
        endpoints: Vec::new(),
    }
}

pub fn ready(host: &str, grades: &[(&str, &str)]) -> Analysis {
    Analysis {
        endpoints: grades
            .iter()
            .map(|(address, grade)| Endpoint {
                ip_address: address.to_string(),
                grade: Some(Grade::new(*grade)),
                status_message: None,
            })
            .collect(),
        ..analysis(host, AnalysisStatus::Ready)
    }
}

pub fn error(host: &str, message: &str) -> Analysis {
    Analysis {
        status_message: Some(message.to_string()),
        ..analysis(host, AnalysisStatus::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Start,
    Fetch,
}

#[derive(Default)]
struct Script {
    /// `false` makes the launch fail; exhausted scripts succeed
    launches: VecDeque<bool>,
    /// `None` is a transport error; exhausted scripts answer IN_PROGRESS
    polls: VecDeque<Option<Analysis>>,
    launch_always_fails: bool,
}

/// Scan repository answering from per-host scripts and recording every call
#[derive(Default)]
pub struct FakeScanRepository {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<(String, CallKind, Instant)>>,
}

impl FakeScanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_launches(self, host: &str, launches: &[bool]) -> Self {
        self.script(host, |script| script.launches.extend(launches));
        self
    }

    pub fn with_launch_always_failing(self, host: &str) -> Self {
        self.script(host, |script| script.launch_always_fails = true);
        self
    }

    pub fn with_polls(self, host: &str, polls: Vec<Option<Analysis>>) -> Self {
        self.script(host, |script| script.polls.extend(polls));
        self
    }

    fn script(&self, host: &str, f: impl FnOnce(&mut Script)) {
        let mut scripts = self.scripts.lock().unwrap();
        f(scripts.entry(host.to_string()).or_default());
    }

    fn record(&self, host: &str, kind: CallKind) {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), kind, Instant::now()));
    }

    /// Instants at which `host` saw a call of `kind`
    pub fn calls(&self, host: &str, kind: CallKind) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, k, _)| h == host && *k == kind)
            .map(|(_, _, at)| *at)
            .collect()
    }
}

#[async_trait]
impl ScanRepository for FakeScanRepository {
    async fn start_analysis(&self, host: &str) -> Result<()> {
        self.record(host, CallKind::Start);

        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts.entry(host.to_string()).or_default();
        let accepted = !script.launch_always_fails && script.launches.pop_front().unwrap_or(true);

        if !accepted {
            return Err(ClientError::api_error(529, "Service is overloaded"))
                .with_context(|| format!("Failed to start analysis of {}", host));
        }
        Ok(())
    }

    async fn fetch_analysis(&self, host: &str) -> Result<Analysis> {
        self.record(host, CallKind::Fetch);

        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts.entry(host.to_string()).or_default();

        match script.polls.pop_front() {
            Some(Some(analysis)) => Ok(analysis),
            Some(None) => bail!("HTTP request failed: connection reset"),
            None => Ok(analysis(host, AnalysisStatus::InProgress)),
        }
    }
}

/// Notifier keeping every message it was asked to send
pub struct RecordingNotifier {
    configured: bool,
    failing: bool,
    messages: Mutex<Vec<Message>>,
}

impl RecordingNotifier {
    pub fn configured() -> Self {
        Self {
            configured: true,
            failing: false,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::configured()
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        self.messages.lock().unwrap().push(message.clone());

        if !self.configured {
            return Ok(Delivery::Skipped);
        }
        if self.failing {
            bail!("API error (status 500): webhook down");
        }
        Ok(Delivery::Sent)
    }
}

/// Buffer collecting formatted log lines of the current thread
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes this thread's events at `WARN` and above into the buffer until
    /// the guard is dropped
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let capture = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
