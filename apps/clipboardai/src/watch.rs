//! `clipboardai watch`: poll the clipboard and print each classified change.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use clipboardai_detect::ContextDetector;
use clipboardai_events::ClipboardEvent;
use clipboardai_llm::ActionEngine;
use clipboardai_monitor::{ArboardClipboard, ChannelObserver, ClipboardMonitor, Dispatcher};
use clipboardai_prompts::{PromptStore, PromptVars};
use clipboardai_storage::{Database, HistoryRepository, NewHistoryEntry};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::runtime::Handle;

const BAR_WIDTH: usize = 10;
const PROCESS_QUEUE: usize = 16;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub process: bool,
    pub poll_interval: Duration,
    pub history: usize,
}

pub async fn run(config: AppConfig, options: WatchOptions) -> Result<()> {
    let detector = Arc::new(ContextDetector::new()?);
    let dispatcher = Arc::new(Dispatcher::new(options.history));

    dispatcher.subscribe_fn(|event| {
        println!(
            "[{}] {}",
            chrono::Local::now().format("%H:%M:%S"),
            format_event(event)
        );
        Ok(())
    });

    if options.process {
        start_processing(&config, &dispatcher)?;
    }

    let mut monitor = ClipboardMonitor::new(
        Arc::new(ArboardClipboard::new()),
        detector,
        Arc::clone(&dispatcher),
    );
    monitor.start_with_interval(options.poll_interval)?;

    println!("Watching clipboard (Ctrl+C to stop)...");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;

    monitor.stop();
    println!(
        "\nStopped. {} change(s) seen, {} kept in memory.",
        monitor.published_count(),
        dispatcher.history_len()
    );
    Ok(())
}

/// Forward events to a worker thread that runs the top suggested action.
fn start_processing(config: &AppConfig, dispatcher: &Dispatcher) -> Result<()> {
    let db = Database::open_creating_dirs(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;
    let prompts = Arc::new(RwLock::new(PromptStore::with_overrides(
        db.load_prompt_overrides()?,
    )));
    let Some(engine) = crate::build_engine(&config.ai, prompts) else {
        tracing::warn!("--process ignored: AI engine is not configured");
        return Ok(());
    };

    let (tx, rx) = crossbeam_channel::bounded::<ClipboardEvent>(PROCESS_QUEUE);
    dispatcher.subscribe(Arc::new(ChannelObserver::new(tx)));

    let handle = Handle::current();
    std::thread::Builder::new()
        .name("clipboardai-process".to_string())
        .spawn(move || {
            for event in rx {
                process_event(&handle, &engine, &db, &event);
            }
        })
        .context("spawning processing thread")?;
    Ok(())
}

fn process_event(handle: &Handle, engine: &ActionEngine, db: &Database, event: &ClipboardEvent) {
    let Some(action) = event.suggested_actions().first() else {
        return;
    };

    let outcome = handle.block_on(engine.execute_action(action, &event.content, &PromptVars::new()));
    match outcome.content {
        Some(output) if outcome.success => {
            let entry = NewHistoryEntry {
                action: action.clone(),
                input_text: event.content.clone(),
                output_text: output.clone(),
                tokens_used: outcome.tokens_used,
                model: Some(outcome.model),
            };
            if let Err(e) = db.add_history(&entry) {
                tracing::warn!(error = %e, "failed to save history");
            }
            println!("  -> {action} ({} tokens)\n{output}\n", outcome.tokens_used);
        }
        _ => {
            tracing::warn!(
                action = %action,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "action failed"
            );
        }
    }
}

/// `[#########-] 0.90`
pub fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "[{}{}] {:.2}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        confidence
    )
}

/// Multi-line summary of an event: type, confidence, preview, actions and metadata.
pub fn format_event(event: &ClipboardEvent) -> String {
    let mut out = format!(
        "{:<16} {}  {}",
        event.content_type().as_str(),
        confidence_bar(event.confidence()),
        event.preview
    );

    if !event.suggested_actions().is_empty() {
        out.push_str("\n    actions: ");
        out.push_str(&event.suggested_actions().join(", "));
    }

    if !event.metadata().is_empty() {
        let fields: Vec<String> = event
            .metadata()
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}={s}"),
                other => format!("{k}={other}"),
            })
            .collect();
        out.push_str("\n    ");
        out.push_str(&fields.join(" "));
    }
    out
}
