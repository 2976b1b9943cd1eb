use std::sync::Arc;

use tokio::io::BufReader;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::annotation_loop;
use crate::io::line_reader;
use crate::state::AppState;

/// Queued lines waiting for annotation
const LINE_CAPACITY: usize = 64;

/// Task spawning and lifecycle for streaming mode
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawn the stdin reader and the annotation loop. The loop ends once
    /// the reader stops and drops its sender.
    pub fn spawn_tasks(&self, pretty: bool) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();
        let (line_tx, line_rx) = kanal::bounded_async(LINE_CAPACITY);

        tasks.spawn(line_reader(
            BufReader::new(tokio::io::stdin()),
            self.cancel_token.child_token(),
            line_tx,
        ));

        tasks.spawn(annotation_loop(
            self.state.clone(),
            line_rx,
            pretty,
            std::io::stdout(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
