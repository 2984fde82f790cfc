// src/internal/logger/logger.rs

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::facade::Logger;
use super::tracing_sink::TracingSink;
use crate::internal::config::LoggingConfig;

/// Registry with the reloadable threshold filter applied; output layers stack on top.
type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync + 'static>;

/// Initialize the global `tracing` subscriber and return a facade bound to it.
pub fn init_logger(cfg: &LoggingConfig) -> anyhow::Result<Logger> {
    let (subscriber, sink) = build_subscriber(cfg, io::stderr)?;
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    // A RUST_LOG filter stays in charge until the threshold is changed explicitly.
    if sink.uses_env_filter() {
        return Ok(Logger::with_threshold(Arc::new(sink), cfg.stderrthreshold));
    }
    let logger = Logger::new(Arc::new(sink));
    logger.set_severity(cfg.stderrthreshold);
    Ok(logger)
}

/// Build the subscriber stack and the sink that drives it, without
/// installing anything globally.
///
/// `console` receives the human-readable output unless
/// `disable_console` is set.
pub fn build_subscriber<W>(
    cfg: &LoggingConfig,
    console: W,
) -> anyhow::Result<(impl Subscriber + Send + Sync + 'static, TracingSink)>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // RUST_LOG wins for the initial filter; the first threshold change replaces it.
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(cfg.stderrthreshold.filter_directive()), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let format = match cfg.format.as_str() {
        "compact" | "full" | "json" => cfg.format.as_str(),
        other => {
            eprintln!("Warning: unknown log format '{}', using compact.", other);
            "compact"
        }
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if !cfg.disable_console {
        layers.push(format_layer(format, console, cfg.color));
    }

    let file_writer = match &cfg.output_path {
        Some(output_path) => {
            let log_file = create_log_file(output_path, cfg.append_to_file)?;
            let writer = SharedWriter::new(log_file);
            layers.push(format_layer(format, writer.clone(), false));
            Some(writer)
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    let sink = TracingSink::new(handle, file_writer).with_env_filter(from_env);
    Ok((subscriber, sink))
}

fn format_layer<W>(format: &str, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    match format {
        "json" => layer.json().boxed(),
        "full" => layer.boxed(),
        _ => layer.compact().boxed(),
    }
}

/// Create or open log file based on configuration
fn create_log_file(path: &str, append: bool) -> anyhow::Result<fs::File> {
    let path = Path::new(path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)?;

    Ok(file)
}

/// Cloneable writer that serializes access to an underlying `Write`.
pub struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> SharedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Run `f` against the wrapped writer.
    pub fn with_inner<R>(&self, f: impl FnOnce(&W) -> R) -> Option<R> {
        self.inner.lock().ok().map(|guard| f(&guard))
    }
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: io::Write> io::Write for SharedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?
            .flush()
    }
}

impl<'a, W: io::Write + Send + 'static> MakeWriter<'a> for SharedWriter<W> {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
