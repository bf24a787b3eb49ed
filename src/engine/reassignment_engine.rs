use crate::bank_file::{build_file_name, generate_csv, ControlRow, DatePolicy, ReassignmentRow};
use crate::engine::errors::{describe_failures, SubmitError, UpdateFailure};
use crate::models::{CardAdjustmentRecord, ExpenseStatus, ValidatedAdjustment};
use crate::storage::{CardLimitGateway, ConsecutiveCounterStore, CounterError, GatewayError};
use crate::types::{ClientNumber, Consecutive, ExpenseId, GroupNumber, UserId};
use chrono::{Local, NaiveDate};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};

/// Identifiers the operator enters before generating a file.
#[derive(Debug, Clone)]
pub struct DialogData {
    pub client_number: ClientNumber,
    pub group_number: GroupNumber
}

/// A reassignment file written to the output directory.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub contents: String,
    pub control: ControlRow,
    pub consecutive: Consecutive
}

/// What a single record changed on the backend, enough to undo it.
#[derive(Debug)]
struct AppliedUpdate {
    user_id: UserId,
    expense_id: ExpenseId,
    previous_limit: Option<Decimal>,
    previous_status: Option<ExpenseStatus>
}

struct UpdateOutcome {
    applied: AppliedUpdate,
    error: Option<GatewayError>
}

/// Checks the submit preconditions for every record of a batch.
pub fn validate_batch(batch: &[CardAdjustmentRecord]) -> Result<Vec<ValidatedAdjustment<'_>>, SubmitError> {
    if batch.is_empty() {
        return Err(SubmitError::EmptyBatch);
    }

    Ok(batch.iter()
        .map(CardAdjustmentRecord::validate)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Disburses a batch of approved expenses and produces the bank reassignment file.
pub struct ReassignmentEngine<G, S> {
    gateway: Arc<G>,
    counter: Arc<S>,
    output_dir: PathBuf,
    date_policy: DatePolicy,
    date: Option<NaiveDate>
}

impl<G: CardLimitGateway, S: ConsecutiveCounterStore> ReassignmentEngine<G, S> {
    pub fn new(gateway: Arc<G>, counter: Arc<S>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            counter,
            output_dir: output_dir.into(),
            date_policy: DatePolicy::default(),
            date: None
        }
    }

    pub fn with_date_policy(mut self, date_policy: DatePolicy) -> Self {
        self.date_policy = date_policy;
        self
    }

    /// Pins the send date instead of using the local calendar date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Runs the whole disbursement for a batch.
    ///
    /// Nothing reaches the backend unless every record is valid and a
    /// consecutive is still available for today. If any backend update fails,
    /// the updates that did go through are reverted and no file is written.
    /// The daily consecutive only advances once the file is on disk. When it
    /// cannot be advanced the file is removed and the updates are reverted.
    pub async fn submit(&self, batch: &[CardAdjustmentRecord], dialog: &DialogData) -> Result<GeneratedFile, SubmitError> {
        let adjustments = validate_batch(batch)?;

        let rows = adjustments.iter()
            .map(|adjustment| ReassignmentRow::prepare(adjustment.record, adjustment.sign, adjustment.amount, self.date_policy))
            .collect::<Result<Vec<_>, _>>()?;

        let today = self.date.unwrap_or_else(|| Local::now().date_naive());
        let consecutive = self.read_consecutive(today).await?;

        info!("Disbursing {} records for group [{}] with consecutive [{consecutive}]", adjustments.len(), dialog.group_number.padded());

        let applied = self.apply_updates(&adjustments).await?;

        let control = ControlRow::build(&rows, &dialog.client_number, &dialog.group_number, today);
        let contents = generate_csv(&rows, &control);
        let file_name = build_file_name(today, &dialog.group_number, consecutive);
        let path = self.output_dir.join(&file_name);

        if let Err(write_error) = self.write_file(&path, &contents).await {
            error!("Reassignment file [{}] could not be written, reverting backend updates: {write_error}", path.display());
            self.revert(applied).await;
            return Err(write_error.into());
        }

        match self.advance_consecutive(today).await {
            Ok(next) => debug!("Next consecutive for [{today}] is [{next}]"),
            Err(CounterError::Exhausted { date }) => warn!("Consecutive [{consecutive}] was the last one available for [{date}]"),
            Err(counter_error) => {
                // A file left behind with an unadvanced counter would be overwritten by the next submit.
                error!("Consecutive for [{today}] could not be advanced, withdrawing [{}]: {counter_error}", path.display());

                if let Err(remove_error) = fs::remove_file(&path).await {
                    error!("Reassignment file [{}] could not be removed: {remove_error}", path.display());
                }

                self.revert(applied).await;
                return Err(counter_error.into());
            }
        }

        info!("Reassignment file [{}] generated", path.display());

        Ok(GeneratedFile {
            file_name,
            path,
            contents,
            control,
            consecutive
        })
    }

    async fn read_consecutive(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        let counter = self.counter.clone();
        spawn_blocking(move || counter.read(date)).await?
    }

    async fn advance_consecutive(&self, date: NaiveDate) -> Result<Consecutive, CounterError> {
        let counter = self.counter.clone();
        spawn_blocking(move || counter.increment(date)).await?
    }

    async fn write_file(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        fs::write(path, contents).await
    }

    /// Runs the records of different card holders concurrently. Records of the
    /// same holder run one after another in batch order, so the last one wins
    /// and each undo sees the value the previous step left behind.
    async fn apply_updates(&self, adjustments: &[ValidatedAdjustment<'_>]) -> Result<Vec<AppliedUpdate>, SubmitError> {
        let mut holders: HashMap<UserId, usize> = HashMap::new();
        let mut queues: Vec<Vec<&ValidatedAdjustment<'_>>> = Vec::new();

        for adjustment in adjustments {
            let index = *holders.entry(adjustment.record.user_id).or_insert_with(|| {
                queues.push(Vec::new());
                queues.len() - 1
            });

            queues[index].push(adjustment);
        }

        let outcomes = join_all(queues.into_iter().map(|queue| self.apply_in_order(queue))).await;

        let mut applied = Vec::with_capacity(adjustments.len());
        let mut failures = Vec::new();

        for outcome in outcomes.into_iter().flatten() {
            if let Some(error) = outcome.error {
                warn!("Update for expense [{}] failed: {error}", outcome.applied.expense_id);
                failures.push(UpdateFailure { expense_id: outcome.applied.expense_id, error });
            }

            applied.push(outcome.applied);
        }

        if failures.is_empty() {
            return Ok(applied);
        }

        let compensation_failures = self.compensate(applied).await;

        let error = SubmitError::BatchUpdate {
            total: adjustments.len(),
            failures,
            compensation_failures
        };

        error!("{error}");

        Err(error)
    }

    /// Stops at the first failure; later records of the holder are left untouched.
    async fn apply_in_order(&self, queue: Vec<&ValidatedAdjustment<'_>>) -> Vec<UpdateOutcome> {
        let mut outcomes = Vec::with_capacity(queue.len());

        for adjustment in queue {
            let outcome = self.apply(adjustment).await;
            let failed = outcome.error.is_some();

            outcomes.push(outcome);

            if failed {
                break;
            }
        }

        outcomes
    }

    async fn apply(&self, adjustment: &ValidatedAdjustment<'_>) -> UpdateOutcome {
        let record = adjustment.record;
        let mut applied = AppliedUpdate {
            user_id: record.user_id,
            expense_id: record.expense_id,
            previous_limit: None,
            previous_status: None
        };

        match self.gateway.update_card_limit(record.user_id, adjustment.new_limit).await {
            Ok(previous) => applied.previous_limit = Some(previous),
            Err(error) => return UpdateOutcome { applied, error: Some(error) }
        }

        match self.gateway.set_expense_status(record.expense_id, ExpenseStatus::Dispersed).await {
            Ok(previous) => applied.previous_status = Some(previous),
            Err(error) => return UpdateOutcome { applied, error: Some(error) }
        }

        UpdateOutcome { applied, error: None }
    }

    async fn revert(&self, applied: Vec<AppliedUpdate>) {
        let compensation_failures = self.compensate(applied).await;

        if !compensation_failures.is_empty() {
            error!("{} backend changes could not be reverted: {}", compensation_failures.len(), describe_failures(&compensation_failures));
        }
    }

    /// Best-effort reversal, newest change of each holder first.
    async fn compensate(&self, applied: Vec<AppliedUpdate>) -> Vec<UpdateFailure> {
        let mut failures = Vec::new();

        for update in applied.into_iter().rev() {
            if let Some(status) = update.previous_status {
                if let Err(error) = self.gateway.set_expense_status(update.expense_id, status).await {
                    error!("Expense [{}] could not be restored to [{status}]: {error}", update.expense_id);
                    failures.push(UpdateFailure { expense_id: update.expense_id, error });
                }
            }

            if let Some(limit) = update.previous_limit {
                if let Err(error) = self.gateway.update_card_limit(update.user_id, limit).await {
                    error!("Card limit for user [{}] could not be restored to [{limit}]: {error}", update.user_id);
                    failures.push(UpdateFailure { expense_id: update.expense_id, error });
                }
            }
        }

        failures
    }
}
