// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig, rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Install `tracing_config` as the global default subscriber. A
/// [`WriterConfig::None`] installs nothing.
///
/// # Errors
///
/// Returns an error when the log file can't be created, or a global subscriber is
/// already installed.
pub fn try_initialize_logging_global(tracing_config: TracingConfig) -> miette::Result<()> {
    if tracing_config.writer_config == WriterConfig::None {
        return Ok(());
    }
    let layers = try_create_layers(&tracing_config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()
}

/// Install `tracing_config` for the current thread only, until the guard is dropped.
///
/// # Errors
///
/// Returns an error when the log file can't be created.
pub fn try_initialize_logging_thread_local(
    tracing_config: TracingConfig,
) -> miette::Result<tracing::dispatcher::DefaultGuard> {
    let layers = try_create_layers(&tracing_config)?;
    Ok(tracing_subscriber::registry().with(layers).set_default())
}

/// Returns the layers without installing them.
///
/// # Errors
///
/// Returns an error when the log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut acc: Vec<Box<DynLayer<tracing_subscriber::Registry>>> =
        vec![Box::new(level_filter)];
    if let Some(layer) = try_create_display_layer(level_filter, &writer_config) {
        acc.push(layer);
    }
    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        acc.push(layer);
    }
    Ok(acc)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let preference = match writer_config {
        WriterConfig::Display(it) | WriterConfig::DisplayAndFile(it, _) => *it,
        WriterConfig::None | WriterConfig::File(_) => return None,
    };
    let fmt_layer = create_fmt!();
    let layer: Box<DynLayer<S>> = match preference {
        DisplayPreference::Stdout => Box::new(
            fmt_layer
                .with_writer(std::io::stdout)
                .with_filter(level_filter),
        ),
        DisplayPreference::Stderr => Box::new(
            fmt_layer
                .with_writer(std::io::stderr)
                .with_filter(level_filter),
        ),
    };
    Some(layer)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error when the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let path = match writer_config {
        WriterConfig::File(it) | WriterConfig::DisplayAndFile(_, it) => it,
        WriterConfig::None | WriterConfig::Display(_) => return Ok(None),
    };
    let file = rolling_file_appender_impl::try_create(path)?;
    Ok(Some(Box::new(
        create_fmt!()
            .with_ansi(false)
            .with_writer(file)
            .with_filter(level_filter),
    )))
}
