//! Incremental delivery of `@defer` and `@stream` results.

use std::{collections::VecDeque, fmt, sync::Arc};

use futures::{
    FutureExt as _, StreamExt as _,
    future::{self, BoxFuture, Either},
    stream::{self, BoxStream, FuturesUnordered},
};
use tracing::{trace, warn};

use crate::{
    ast::Type,
    executor::{
        ExecutionError, ExecutionResult, Executor, Path, collect::DeferredFragment,
        complete::FieldPlan,
    },
    schema::meta::{EventStream, ObjectMeta},
    types::FieldValue,
    value::{Object, Value},
};

/// Outcome of executing an operation that may deliver parts of its result
/// later.
pub enum ExecutionOutput<'a> {
    /// The whole result at once.
    Single(ExecutionResult),
    /// The initial result, followed by the deferred and streamed parts.
    Incremental {
        /// Result without the deferred and streamed parts.
        initial: InitialIncrementalResult,
        /// Deferred and streamed parts, as they complete.
        subsequent: BoxStream<'a, SubsequentIncrementalResult>,
    },
}

impl ExecutionOutput<'_> {
    /// The whole result, if delivered at once.
    pub fn into_single(self) -> Option<ExecutionResult> {
        match self {
            Self::Single(result) => Some(result),
            Self::Incremental { .. } => None,
        }
    }
}

impl fmt::Debug for ExecutionOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(result) => f.debug_tuple("Single").field(result).finish(),
            Self::Incremental { initial, .. } => f
                .debug_struct("Incremental")
                .field("initial", initial)
                .finish_non_exhaustive(),
        }
    }
}

/// First payload of an incremental result.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialIncrementalResult {
    /// Data of the non-deferred fields.
    pub data: Object,
    /// Errors raised while computing `data`.
    pub errors: Vec<ExecutionError>,
    /// Always `true`: more payloads follow.
    pub has_next: bool,
}

/// Later payload of an incremental result.
#[derive(Clone, Debug, PartialEq)]
pub struct SubsequentIncrementalResult {
    /// Parts completed since the previous payload.
    pub incremental: Vec<IncrementalResult>,
    /// Whether more payloads follow.
    pub has_next: bool,
}

/// One deferred or streamed part of a result.
#[derive(Clone, Debug, PartialEq)]
pub enum IncrementalResult {
    /// Fields of a deferred fragment.
    Defer {
        /// Fields of the fragment, or [`None`] if a non-null field of it
        /// failed.
        data: Option<Object>,
        /// Errors raised while computing `data`.
        errors: Vec<ExecutionError>,
        /// Path of the object the fields belong to.
        path: Path,
        /// Label given to `@defer`.
        label: Option<String>,
    },
    /// Items of a streamed list.
    Stream {
        /// Completed items, or [`None`] if a non-null item failed, which
        /// ends the stream.
        items: Option<Vec<Value>>,
        /// Errors raised while completing `items`.
        errors: Vec<ExecutionError>,
        /// Path of the first item.
        path: Path,
        /// Label given to `@stream`.
        label: Option<String>,
    },
}

impl IncrementalResult {
    /// Path the part is delivered at.
    pub fn path(&self) -> &Path {
        match self {
            Self::Defer { path, .. } | Self::Stream { path, .. } => path,
        }
    }

    /// Errors raised while computing the part.
    pub fn errors(&self) -> &[ExecutionError] {
        match self {
            Self::Defer { errors, .. } | Self::Stream { errors, .. } => errors,
        }
    }
}

/// Active `@stream` on a list field.
pub(super) struct StreamUsage {
    pub(super) initial_count: usize,
    pub(super) label: Option<String>,
}

/// Deferred or streamed work, delivered in its own payload.
pub(super) struct IncrementalTask<'a> {
    /// Path the result is delivered at. The task is dropped if a value on
    /// this path becomes `null` before it is delivered.
    pub(super) path: Path,
    pub(super) run: BoxFuture<'a, TaskOutcome<'a>>,
}

/// Items of a streamed list that are still to be delivered.
pub(super) enum StreamSource {
    /// Items at hand.
    Items(VecDeque<FieldValue>),
    /// Items produced over time.
    Pending(EventStream),
}

impl StreamSource {
    fn is_exhausted(&self) -> bool {
        matches!(self, Self::Items(items) if items.is_empty())
    }
}

pub(super) struct TaskOutcome<'a> {
    /// Nothing is delivered by a stream found to be over.
    result: Option<IncrementalResult>,
    /// Work found while running the task, started once its result is
    /// delivered.
    follow_ups: Vec<IncrementalTask<'a>>,
}

impl<'a, C: Sync> Executor<'a, C> {
    /// Queues the deferred fragments selected on the object at `path`.
    pub(super) fn queue_deferred(
        &self,
        object_type: &'a ObjectMeta<C>,
        source: &Arc<FieldValue>,
        path: &Path,
        deferred: Vec<DeferredFragment<'a>>,
    ) {
        for fragment in deferred {
            let task = self.defer_task(object_type, source.clone(), path.clone(), fragment);
            self.queue(task);
        }
    }

    fn defer_task(
        &self,
        object_type: &'a ObjectMeta<C>,
        source: Arc<FieldValue>,
        path: Path,
        fragment: DeferredFragment<'a>,
    ) -> IncrementalTask<'a> {
        let exec = self.in_new_group();
        let task_path = path.clone();

        let run = async move {
            let DeferredFragment { label, fields } = fragment;
            trace!(path = %path, label = ?label, "executing deferred fragment");
            exec.queue_deferred(object_type, &source, &path, fields.deferred);
            let data = match exec
                .execute_fields(object_type, source, &path, fields.grouped_field_set)
                .await
            {
                Ok(data) => Some(data),
                Err(e) => {
                    exec.push_error(e);
                    None
                }
            };
            let follow_ups = if data.is_some() {
                exec.take_pending()
            } else {
                Vec::new()
            };
            TaskOutcome {
                result: Some(IncrementalResult::Defer {
                    data,
                    errors: exec.take_errors(),
                    path,
                    label,
                }),
                follow_ups,
            }
        }
        .boxed();

        IncrementalTask { path: task_path, run }
    }

    /// Next item of a list, waiting for it if it is produced over time.
    ///
    /// An error raised by the source is located at `path`.
    pub(super) async fn next_list_item(
        &self,
        plan: &FieldPlan<'a, C>,
        source: &mut StreamSource,
        path: &Path,
    ) -> Result<Option<FieldValue>, ExecutionError> {
        let items = match source {
            StreamSource::Items(items) => return Ok(items.pop_front()),
            StreamSource::Pending(items) => items,
        };
        let signal = &self.ctx.abort_signal;
        if signal.is_aborted() {
            return Err(plan.error(path, signal.reason()));
        }
        match future::select(items.next(), signal.aborted()).await {
            Either::Left((item, _)) => item.transpose().map_err(|e| plan.error(path, e)),
            Either::Right(((), _)) => {
                warn!(path = %path, "operation aborted while waiting for a list item");
                Err(plan.error(path, signal.reason()))
            }
        }
    }

    /// Task delivering the next item of a streamed list, at `index`. The
    /// item after it is pulled once this one is delivered.
    pub(super) fn stream_task(
        &self,
        plan: Arc<FieldPlan<'a, C>>,
        item_type: &'a Type<'static>,
        list_path: Path,
        label: Option<String>,
        index: usize,
        mut remaining: StreamSource,
    ) -> IncrementalTask<'a> {
        let exec = self.in_new_group();
        let item_path = list_path.index(index);
        let task_path = item_path.clone();

        let run = async move {
            let completed = match exec.next_list_item(&plan, &mut remaining, &item_path).await {
                Ok(None) => {
                    return TaskOutcome {
                        result: None,
                        follow_ups: Vec::new(),
                    };
                }
                Ok(Some(item)) => {
                    trace!(path = %item_path, label = ?label, "completing streamed item");
                    exec.complete_list_item(plan.clone(), item_type, item_path.clone(), item)
                        .await
                }
                Err(e) => Err(e),
            };
            let items = match completed {
                Ok(value) => Some(vec![value]),
                Err(e) => {
                    exec.push_error(e);
                    None
                }
            };

            let mut follow_ups = Vec::new();
            if items.is_some() {
                follow_ups = exec.take_pending();
                if !remaining.is_exhausted() {
                    follow_ups.push(exec.stream_task(
                        plan,
                        item_type,
                        list_path,
                        label.clone(),
                        index + 1,
                        remaining,
                    ));
                }
            }
            TaskOutcome {
                result: Some(IncrementalResult::Stream {
                    items,
                    errors: exec.take_errors(),
                    path: item_path,
                    label,
                }),
                follow_ups,
            }
        }
        .boxed();

        IncrementalTask { path: task_path, run }
    }
}

/// Runs the `pending` tasks concurrently, yielding one payload per completed
/// task. Work found by a task starts once the task's payload is yielded.
pub(super) fn subsequent_results(
    pending: Vec<IncrementalTask<'_>>,
) -> BoxStream<'_, SubsequentIncrementalResult> {
    let running = pending
        .into_iter()
        .map(|task| task.run)
        .collect::<FuturesUnordered<_>>();

    stream::unfold(running, |mut running| async move {
        loop {
            let TaskOutcome { result, follow_ups } = running.next().await?;
            running.extend(follow_ups.into_iter().map(|task| task.run));
            let has_next = !running.is_empty();
            if result.is_some() || !has_next {
                let payload = SubsequentIncrementalResult {
                    incremental: result.into_iter().collect(),
                    has_next,
                };
                return Some((payload, running));
            }
        }
    })
    .boxed()
}
