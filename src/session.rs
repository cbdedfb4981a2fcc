//! Upload session: the single owner of the current [`DataSet`] and [`Status`].
//!
//! An [`UploadSession`] accepts uploads either synchronously ([`UploadSession::ingest`]) or in the
//! background ([`UploadSession::submit`]). Background uploads run on the rayon global pool and
//! report back over a channel; nothing changes until the caller drains completions with
//! [`UploadSession::poll`] or [`UploadSession::wait`].
//!
//! Every applied completion replaces both the dataset (on success) and the status line. With the
//! default [`CompletionOrdering::CompletionOrder`], whichever upload finishes last wins, even if it
//! was submitted first.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{ingest_upload, IngestionContext, IngestionOptions, UploadedFile};
use crate::preview::{Preview, PREVIEW_ROW_LIMIT};
use crate::sample::{export_sample, SampleFile, SampleFormat};
use crate::status::{FailureKind, Status};
use crate::types::DataSet;

/// How completions that arrive out of submission order are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionOrdering {
    /// Apply every completion as it arrives; the last one to finish wins.
    #[default]
    CompletionOrder,
    /// Drop a completion if a later submission has already been applied.
    LatestSubmission,
}

/// Options for an [`UploadSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Options passed to every ingestion.
    pub ingestion: IngestionOptions,
    /// Ordering policy for background completions.
    pub ordering: CompletionOrdering,
    /// Maximum number of rows returned by [`UploadSession::preview`].
    pub preview_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ingestion: IngestionOptions::default(),
            ordering: CompletionOrdering::default(),
            preview_limit: PREVIEW_ROW_LIMIT,
        }
    }
}

/// Identifies one upload; tickets increase with submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

/// A background upload that has been received by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed {
    pub ticket: UploadTicket,
    /// `false` when the completion was dropped by [`CompletionOrdering::LatestSubmission`].
    pub applied: bool,
}

struct Completion {
    ticket: UploadTicket,
    ctx: IngestionContext,
    result: IngestionResult<DataSet>,
}

/// Holds the rows and status line of the most recent upload.
pub struct UploadSession {
    dataset: DataSet,
    status: Status,
    options: SessionOptions,
    next_ticket: u64,
    last_applied: Option<UploadTicket>,
    in_flight: usize,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl UploadSession {
    /// Create an empty session: no rows, empty status.
    pub fn new(options: SessionOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            dataset: DataSet::default(),
            status: Status::default(),
            options,
            next_ticket: 0,
            last_applied: None,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Rows of the most recent successful upload.
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    /// Outcome message of the most recent upload attempt.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Preview of the current rows, or `None` when there are none.
    pub fn preview(&self) -> Option<Preview> {
        Preview::from_dataset(&self.dataset, self.options.preview_limit)
    }

    /// Number of background uploads not yet received.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Ticket of the last completion that changed the session.
    pub fn last_applied(&self) -> Option<UploadTicket> {
        self.last_applied
    }

    /// Ingest `file` on the calling thread and apply the result immediately.
    ///
    /// `None` is a no-op and returns `None`.
    pub fn ingest(&mut self, file: Option<UploadedFile>) -> Option<UploadTicket> {
        let file = file?;
        let ticket = self.issue_ticket();
        let completion = run_ingestion(ticket, &file, &self.options.ingestion);
        self.apply(completion);
        Some(ticket)
    }

    /// Start ingesting `file` in the background.
    ///
    /// The session is unchanged until the completion is drained by [`Self::poll`] or
    /// [`Self::wait`]. `None` is a no-op and returns `None`.
    pub fn submit(&mut self, file: Option<UploadedFile>) -> Option<UploadTicket> {
        let file = file?;
        let ticket = self.issue_ticket();
        let options = self.options.ingestion.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        rayon::spawn(move || {
            let completion = run_ingestion(ticket, &file, &options);
            // The receiver lives as long as the session; a dropped session discards the result.
            let _ = tx.send(completion);
        });
        Some(ticket)
    }

    /// Apply every completion that is already available, without blocking.
    pub fn poll(&mut self) -> Vec<Completed> {
        let mut out = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            out.push(self.apply(completion));
        }
        out
    }

    /// Block until the next background upload finishes and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub fn wait(&mut self) -> Option<Completed> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(self.apply(completion))
    }

    /// Block until every background upload has finished, applying each in arrival order.
    pub fn wait_all(&mut self) -> Vec<Completed> {
        let mut out = Vec::with_capacity(self.in_flight);
        while let Some(done) = self.wait() {
            out.push(done);
        }
        out
    }

    /// Encode the sample template. Session state is not touched.
    pub fn export_sample(&self, format: SampleFormat) -> IngestionResult<SampleFile> {
        export_sample(format)
    }

    fn issue_ticket(&mut self) -> UploadTicket {
        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn apply(&mut self, completion: Completion) -> Completed {
        let Completion { ticket, ctx, result } = completion;

        let stale = self.options.ordering == CompletionOrdering::LatestSubmission
            && self.last_applied.is_some_and(|last| ticket < last);
        if stale {
            if let Some(obs) = self.options.ingestion.observer.as_ref() {
                obs.on_discarded(&ctx);
            }
            return Completed { ticket, applied: false };
        }

        match result {
            Ok(dataset) => {
                self.status = Status::loaded(dataset.row_count(), ctx.format);
                self.dataset = dataset;
            }
            Err(_) => {
                self.status = Status::failed(FailureKind::for_format(ctx.format));
            }
        }
        self.last_applied = Some(ticket);
        Completed { ticket, applied: true }
    }
}

fn run_ingestion(ticket: UploadTicket, file: &UploadedFile, options: &IngestionOptions) -> Completion {
    let ctx = IngestionContext {
        file_name: file.name.clone(),
        format: options.format_for(file),
    };
    // Decoders may panic on malformed input; that is still just a failed upload.
    let result = panic::catch_unwind(AssertUnwindSafe(|| ingest_upload(file, options))).unwrap_or_else(|_| {
        Err(IngestionError::InvalidInput {
            message: format!("decoder panicked while reading '{}'", file.name),
        })
    });
    Completion { ticket, ctx, result }
}
