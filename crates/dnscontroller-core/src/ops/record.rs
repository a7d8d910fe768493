// ── Record lifecycle ──

use tracing::{debug, info, warn};

use crate::context::OpContext;
use crate::error::{CoreError, StoreError};
use crate::model::{Answer, Record};
use crate::store::{Database, RecordRow, Store};

impl Record {
    /// Look the record up by its normalized `(name, type)` and return it
    /// with its answers loaded.
    pub async fn find<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        self.validate()?;

        let row = ctx
            .store
            .find_record(&self.name.to_lowercase(), &self.record_type.to_uppercase())
            .await?;

        Self::hydrate(ctx, row).await
    }

    /// Insert the record and return the stored version.
    pub async fn create<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        let row = self.to_persisted()?;
        let stored = ctx.store.insert_record(row).await?;

        let record = Self::hydrate(ctx, stored).await?;
        info!(parent: &ctx.span, record = %record.path(), id = %record.id, "record created");
        Ok(record)
    }

    /// Create the record, or return the existing one if its `(name, type)`
    /// is already taken. Any other failure is returned as is.
    pub async fn create_or_find<S: Store + ?Sized>(
        &self,
        ctx: &OpContext<'_, S>,
    ) -> Result<Self, CoreError> {
        match self.create(ctx).await {
            Err(err) if err.is_duplicate() => {
                debug!(parent: &ctx.span, record = %self.path(), "record exists, finding");
                self.find(ctx).await
            }
            other => other,
        }
    }

    pub async fn delete<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<(), CoreError> {
        self.validate()?;

        let found = self.find(ctx).await?;
        ctx.store.delete_record(&found.id.to_string()).await?;

        info!(parent: &ctx.span, record = %found.path(), id = %found.id, "record deleted");
        Ok(())
    }

    /// Replace `answers` with what is stored for this record. A record with
    /// no answers ends up with an empty list, never `None`.
    pub async fn load_answers<S: Store + ?Sized>(
        &mut self,
        ctx: &OpContext<'_, S>,
    ) -> Result<(), CoreError> {
        let rows = ctx.store.answers_for_record(&self.id.to_string()).await?;

        if rows.is_empty() {
            self.answers = Some(Vec::new());
            return Ok(());
        }

        debug!(parent: &ctx.span, record = %self.path(), count = rows.len(), "loading answers");

        let mut answers = Vec::with_capacity(rows.len());
        for row in rows {
            answers.push(Answer::hydrate(ctx, row).await?);
        }
        self.answers = Some(answers);

        Ok(())
    }

    /// Create `answers` under this (already found) record in one
    /// transaction, then return the record reloaded.
    ///
    /// If any answer fails, none of them are kept.
    pub async fn create_answers<D: Database + ?Sized>(
        &self,
        ctx: &OpContext<'_, D>,
        answers: Vec<Answer>,
    ) -> Result<Self, CoreError> {
        if self.id.is_nil() {
            return Err(StoreError::NotFound {
                entity: "record",
                key: self.path(),
            }
            .into());
        }

        let count = answers.len();
        let tx = ctx.store.begin().await?;

        let outcome = {
            let tx_ctx = ctx.with_store(tx.as_ref());
            let mut outcome = Ok(());
            for mut answer in answers {
                answer.record_id = self.id;
                if let Err(err) = answer.create(&tx_ctx).await {
                    outcome = Err(err);
                    break;
                }
            }
            outcome
        };

        match outcome {
            Ok(()) => tx.commit().await?,
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(parent: &ctx.span, error = %rollback, "rollback failed");
                }
                return Err(err);
            }
        }

        info!(parent: &ctx.span, record = %self.path(), count, "answers created for record");
        self.find(ctx).await
    }

    async fn hydrate<S: Store + ?Sized>(
        ctx: &OpContext<'_, S>,
        row: RecordRow,
    ) -> Result<Self, CoreError> {
        let mut record = Self::from_persisted(row)?;
        debug!(parent: &ctx.span, record = %record.path(), id = %record.id, "record loaded");

        record.load_answers(ctx).await?;
        Ok(record)
    }
}
