use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::debug;

use crate::{
    decoder::LineDecoder,
    error::{AnalyzerError, AnalyzerResult},
    models::LocatedLog,
};

pub const LINE_BATCH_SIZE: usize = 10_000;

/// Reads `log` on the blocking pool and forwards its lines in batches.
/// Resolves to the number of lines read.
pub fn spawn_reader(log: LocatedLog, tx: Sender<Vec<String>>) -> JoinHandle<AnalyzerResult<usize>> {
    tokio::task::spawn_blocking(move || read_batches(&log, &tx))
}

/// Stops with [`AnalyzerError::Cancelled`] as soon as the receiver is gone;
/// the file is closed on return either way.
pub fn read_batches(log: &LocatedLog, tx: &Sender<Vec<String>>) -> AnalyzerResult<usize> {
    let mut read = 0;
    let mut batch = Vec::with_capacity(LINE_BATCH_SIZE);
    for line in LineDecoder::open(log)? {
        batch.push(line?);
        read += 1;
        if batch.len() >= LINE_BATCH_SIZE {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(LINE_BATCH_SIZE));
            if tx.blocking_send(full).is_err() {
                debug!(read, "consumer dropped, stopping reader");
                return Err(AnalyzerError::Cancelled);
            }
        }
    }
    if !batch.is_empty() && tx.blocking_send(batch).is_err() {
        return Err(AnalyzerError::Cancelled);
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use std::fs;
    use tokio::sync::mpsc;

    fn plain_log(dir: &tempfile::TempDir, lines: usize) -> LocatedLog {
        let path = dir.path().join("nginx-access-ui.log-20170630");
        let body: String = (0..lines).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, body).unwrap();
        LocatedLog {
            path,
            name: "nginx-access-ui.log-20170630".into(),
            date: "20170630".parse().unwrap(),
            compressed: false,
        }
    }

    #[tokio::test]
    async fn batches_cover_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = plain_log(&dir, LINE_BATCH_SIZE + 5);
        let (tx, mut rx) = mpsc::channel(4);
        let reader = spawn_reader(log, tx);

        let mut sizes = Vec::new();
        while let Some(batch) = rx.recv().await {
            sizes.push(batch.len());
        }
        assert_eq!(sizes, vec![LINE_BATCH_SIZE, 5]);
        assert_eq!(reader.await.unwrap().unwrap(), LINE_BATCH_SIZE + 5);
    }

    #[tokio::test]
    async fn dropped_receiver_stops_reading() {
        let dir = tempfile::tempdir().unwrap();
        let log = plain_log(&dir, LINE_BATCH_SIZE * 3);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let result = spawn_reader(log, tx).await.unwrap();
        assert_that!(matches!(result, Err(AnalyzerError::Cancelled))).is_true();
    }
}
