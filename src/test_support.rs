//! In-process HTTP server used by unit tests.
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use url::Url;

pub(crate) struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: Arc<AtomicU64>,
}

impl ServerHandle {
    /// Number of requests the server has answered.
    pub(crate) fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ServerBehavior {
    pub(crate) status: u16,
    pub(crate) delay: Duration,
}

impl ServerBehavior {
    pub(crate) const fn status(status: u16) -> Self {
        Self {
            status,
            delay: Duration::ZERO,
        }
    }

    pub(crate) const fn delayed(status: u16, delay: Duration) -> Self {
        Self { status, delay }
    }
}

/// Spawn a lightweight HTTP server answering every request with `behavior`.
pub(crate) fn spawn_http_server(behavior: ServerBehavior) -> Result<(Url, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicU64::new(0));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, behavior, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(_) => break,
            }
        }
    });

    let url = Url::parse(&format!("http://{}/", addr))
        .map_err(|err| format!("server url failed: {}", err))?;
    Ok((
        url,
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    ))
}

/// Address with nothing listening on it.
pub(crate) fn closed_port_url() -> Result<Url, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind probe port failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Url::parse(&format!("http://{}/", addr)).map_err(|err| format!("url failed: {}", err))
}

fn handle_client(mut stream: TcpStream, behavior: ServerBehavior, hits: &AtomicU64) {
    drop(stream.set_nonblocking(false));
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    if !behavior.delay.is_zero() {
        thread::sleep(behavior.delay);
    }
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 2\r\nLocation: /elsewhere\r\nConnection: close\r\n\r\nOK",
        behavior.status,
        reason_phrase(behavior.status)
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    hits.fetch_add(1, Ordering::SeqCst);
    drop(stream.shutdown(Shutdown::Both));
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        301 => "Moved Permanently",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Runs an async test body on a small multi-thread runtime.
pub(crate) fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Executor that answers every request with `class` after `latency`.
pub(crate) struct StubExecutor {
    latency: Duration,
    class: crate::metrics::OutcomeClass,
    calls: AtomicU64,
}

impl StubExecutor {
    pub(crate) fn new(latency: Duration) -> Arc<Self> {
        Self::with_class(latency, crate::metrics::OutcomeClass::Success)
    }

    pub(crate) fn with_class(latency: Duration, class: crate::metrics::OutcomeClass) -> Arc<Self> {
        Arc::new(Self {
            latency,
            class,
            calls: AtomicU64::new(0),
        })
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl crate::http::RequestExecutor for StubExecutor {
    async fn execute(&self) -> crate::metrics::RequestOutcome {
        let started_at = tokio::time::Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let status = match self.class {
            crate::metrics::OutcomeClass::Success => Some(200),
            crate::metrics::OutcomeClass::HttpError => Some(500),
            crate::metrics::OutcomeClass::Timeout
            | crate::metrics::OutcomeClass::TransportError => None,
        };
        crate::metrics::RequestOutcome::new(started_at, self.class, status)
    }
}
