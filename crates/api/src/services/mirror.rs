use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::sheets::mirror::MirrorOp;
use crate::sheets::SheetMirror;

/// Sending side of the spreadsheet mirror queue. Enqueueing never blocks
/// and never fails the caller.
#[derive(Clone, Default)]
pub struct MirrorHandle {
    tx: Option<mpsc::UnboundedSender<MirrorOp>>,
}

impl MirrorHandle {
    /// A handle that logs and drops every operation.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn enqueue(&self, op: MirrorOp) {
        match &self.tx {
            Some(tx) => {
                if let Err(err) = tx.send(op) {
                    warn!(op = err.0.kind(), "spreadsheet mirror worker stopped, dropping operation");
                }
            }
            None => debug!(op = op.kind(), "spreadsheet mirror disabled, dropping operation"),
        }
    }
}

/// Spawn the worker that applies mirror operations one at a time, in the
/// order they were enqueued. The task ends once every handle is dropped.
pub fn spawn_mirror_worker(mirror: SheetMirror) -> (MirrorHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<MirrorOp>();

    let task = tokio::spawn(async move {
        info!("Starting spreadsheet mirror worker");
        while let Some(op) = rx.recv().await {
            match mirror.apply(&op).await {
                Ok(()) => debug!(op = op.kind(), "mirrored to spreadsheet"),
                Err(err) => warn!(op = op.kind(), error = %err, "spreadsheet mirror failed"),
            }
        }
        info!("Spreadsheet mirror worker stopped");
    });

    (MirrorHandle { tx: Some(tx) }, task)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sheets::{Band, MemorySheets};

    #[tokio::test]
    async fn test_worker_applies_in_order_and_survives_failures() {
        let sheets = Arc::new(MemorySheets::with_template().await);
        let (handle, task) = spawn_mirror_worker(SheetMirror::new(sheets.clone()));

        handle.enqueue(MirrorOp::CreateClubSheet { club_name: "Tiger TKD".into() });
        handle.enqueue(MirrorOp::Append {
            sheet: "No Such Club".into(),
            band: Band::COMPETITORS,
            values: vec!["Lost".into(), "X0".into()],
        });
        for id in ["A1", "A2", "A3"] {
            handle.enqueue(MirrorOp::Append {
                sheet: "Tiger TKD".into(),
                band: Band::COMPETITORS,
                values: vec![format!("name {id}"), id.into()],
            });
        }
        handle.enqueue(MirrorOp::Delete {
            sheet: "Tiger TKD".into(),
            band: Band::COMPETITORS,
            id_number: "A1".into(),
        });
        drop(handle);
        task.await.unwrap();

        let rows = sheets.band_rows("Tiger TKD", Band::COMPETITORS).await;
        let ids: Vec<_> = rows[1..].iter().map(|(_, r)| r[1].as_str()).collect();
        assert_eq!(ids, vec!["A2", "A3"]);
    }

    #[test]
    fn test_disabled_handle_drops_operations() {
        let handle = MirrorHandle::disabled();
        assert!(!handle.is_enabled());
        handle.enqueue(MirrorOp::DeleteAgeCategory { id_number: "A1".into() });
    }
}
