use std::any::Any;

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};

use crate::errors::StorageError;
use regdeck_core::errors::{Error, Result, StoreError};

// A queued write job: runs against the actor's dedicated connection and
// answers through a oneshot. The return type is erased so one channel
// carries every job shape.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> + Send>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for submitting write jobs to the writer actor.
///
/// SQLite allows a single writer at a time; funneling every write through
/// one actor (each job inside an immediate transaction) keeps writes
/// serialized without holding locks across await points.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, Reply)>,
}

impl WriteHandle {
    /// Executes `job` on the writer connection and awaits its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Store(StoreError::Internal("writer actor stopped".into())))?;

        let boxed = ret_rx
            .await
            .map_err(|_| Error::Store(StoreError::Internal("writer actor dropped reply".into())))??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Store(StoreError::Internal(
                "writer actor returned an unexpected type".into(),
            ))
        })
    }
}

/// Spawns the background writer task. The actor owns one pooled connection
/// for its whole lifetime and processes jobs strictly in order.
pub fn spawn_writer(pool: crate::db::DbPool) -> Result<WriteHandle> {
    let (tx, mut rx) = mpsc::channel::<(Job, Reply)>(1024);

    let mut conn = pool
        .get()
        .map_err(|e| Error::Store(StoreError::PoolCreationFailed(e.to_string())))?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        // Channel closed: every WriteHandle dropped, actor exits.
    });

    Ok(WriteHandle { tx })
}
