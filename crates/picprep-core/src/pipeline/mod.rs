//! Background apply pipeline.
//!
//! Requests run on a worker pool; results come back over a channel and are
//! bound on the thread that owns the pipeline. Slot handles are `Rc`, so the
//! pipeline cannot leave that thread and binders never run on a worker.
//!
//! # Lifecycle
//!
//! ```text
//! submit ─► worker: decode? ─► operation ─► channel ─► poll/wait/finish
//!                                                         │
//!                              token live and newest? ────┤
//!                                 yes: Binder::bind       │
//!                                 no:  dropped (Stale)    ┘
//! ```
//!
//! Nothing is retried or cancelled. A computation whose slot moved on runs
//! to completion and its result is discarded at delivery.

mod job;
mod request;
mod slot;

use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

use crate::config::{ConfigError, PrepConfig};
use job::{Completion, Job};

pub use request::{
    ContentSource, DecodePlan, Operation, RequestId, TargetToken, TransformError, TransformInput,
    TransformRequest,
};
pub use slot::{Binder, Slot, SlotHandle};

/// Errors setting up a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::InvalidConfig(err.0)
    }
}

/// What happened to a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The result was handed to the slot's binder.
    Bound,
    /// The slot moved on; the result was dropped.
    Stale,
    /// The request failed. The binder was told only if the slot still
    /// accepted results for this request.
    Failed(TransformError),
}

/// Report of one finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: RequestId,
    pub token: TargetToken,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn is_bound(&self) -> bool {
        self.status == DeliveryStatus::Bound
    }
}

/// Owning-thread half of a request, kept until its completion arrives.
struct Pending<B> {
    token: TargetToken,
    source: ContentSource,
    slot: SlotHandle<B>,
}

/// Runs transforms in the background and binds results on the owning thread.
pub struct ApplyPipeline<B: Binder> {
    config: PrepConfig,
    pool: ThreadPool,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: HashMap<RequestId, Pending<B>>,
    next_id: u64,
}

impl<B: Binder> ApplyPipeline<B> {
    /// Start a pipeline with its own worker pool.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidConfig` if the configuration does not
    /// validate, or `PipelineError::ThreadPool` if workers cannot be spawned.
    pub fn new(config: &PrepConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let prefix = config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;

        debug!(
            "apply pipeline started with {} workers",
            pool.current_num_threads()
        );

        let (sender, receiver) = crossbeam_channel::unbounded();
        Ok(Self {
            config: config.clone(),
            pool,
            sender,
            receiver,
            pending: HashMap::new(),
            next_id: 0,
        })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Queue a request. Never blocks.
    pub fn submit(&mut self, request: TransformRequest<B>) -> RequestId {
        let job = self.register(request);
        let id = job.id;
        self.dispatch(job);
        id
    }

    /// Deliver every finished request without blocking.
    pub fn poll(&mut self) -> Vec<Delivery> {
        let completions: Vec<Completion> = self.receiver.try_iter().collect();
        completions
            .into_iter()
            .filter_map(|completion| self.deliver(completion))
            .collect()
    }

    /// Block up to `timeout` for the next finished request.
    ///
    /// Returns `None` right away when nothing is in flight.
    pub fn wait(&mut self, timeout: Duration) -> Option<Delivery> {
        if self.pending.is_empty() {
            return None;
        }
        let completion = self.receiver.recv_timeout(timeout).ok()?;
        self.deliver(completion)
    }

    /// Block until every submitted request has been delivered.
    pub fn finish(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(self.pending.len());
        while !self.pending.is_empty() {
            // The pipeline holds a sender, so this only fails if every
            // worker-side sender was dropped without reporting.
            let Ok(completion) = self.receiver.recv() else {
                break;
            };
            deliveries.extend(self.deliver(completion));
        }
        deliveries
    }

    /// Requests submitted but not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn register(&mut self, request: TransformRequest<B>) -> Job {
        let TransformRequest {
            input,
            operation,
            token,
            source,
            slot,
        } = request;

        let id = RequestId(self.next_id);
        self.next_id += 1;

        debug!("request {id} for {token}: {operation:?} on {input:?}");
        self.pending.insert(
            id,
            Pending {
                token,
                source,
                slot,
            },
        );

        Job {
            id,
            input,
            operation,
        }
    }

    fn dispatch(&self, job: Job) {
        let sender = self.sender.clone();
        self.pool.spawn(move || {
            // The receiver is gone only if the pipeline was dropped.
            let _ = sender.send(job.run());
        });
    }

    fn deliver(&mut self, completion: Completion) -> Option<Delivery> {
        let Completion { id, outcome } = completion;
        let Some(Pending {
            token,
            source,
            slot,
        }) = self.pending.remove(&id)
        else {
            warn!("completion for unknown request {id}");
            return None;
        };

        let mut slot = slot.borrow_mut();
        let status = match outcome {
            Ok(image) if slot.accepts(id, &token) => {
                slot.bind(id, image, source);
                DeliveryStatus::Bound
            }
            Ok(_) => {
                debug!("request {id} for {token} is stale, dropping result");
                DeliveryStatus::Stale
            }
            Err(error) => {
                if slot.accepts(id, &token) {
                    warn!("request {id} for {token} failed: {error}");
                    slot.fail(&error);
                } else {
                    debug!("request {id} for {token} failed after its slot moved past it: {error}");
                }
                DeliveryStatus::Failed(error)
            }
        };

        Some(Delivery { id, token, status })
    }
}
