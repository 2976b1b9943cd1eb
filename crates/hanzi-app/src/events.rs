use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use hanzi_core::types::Annotation;
use kanal::AsyncReceiver;
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;

pub fn render(annotation: &Annotation, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(annotation)
    } else {
        serde_json::to_string(annotation)
    }
}

/// Annotate a single text; a translation failure is an error
pub async fn annotate_once<W: Write>(
    state: &AppState,
    text: &str,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let request_id = Uuid::new_v4();
    let annotation = state
        .engine
        .annotate(text)
        .instrument(tracing::info_span!("annotate", %request_id))
        .await
        .context("annotation failed")?;

    writeln!(out, "{}", render(&annotation, pretty)?)?;
    Ok(())
}

/// Annotate every line received until the channel closes. Failed lines are
/// logged and skipped.
pub async fn annotation_loop<W: Write + Send>(
    state: Arc<AppState>,
    line_rx: AsyncReceiver<String>,
    pretty: bool,
    mut out: W,
) -> anyhow::Result<()> {
    tracing::info!("Waiting for input lines");

    while let Ok(line) = line_rx.recv().await {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, "Line received: {} chars", line.chars().count());

        let result = state
            .engine
            .annotate(&line)
            .instrument(tracing::info_span!("annotate", %request_id))
            .await;

        match result {
            Ok(annotation) => {
                writeln!(out, "{}", render(&annotation, pretty)?)?;
                out.flush()?;
            }
            Err(e) => tracing::error!(%request_id, "Failed to annotate line: {}", e),
        }
    }

    tracing::info!("Input channel closed");
    Ok(())
}
