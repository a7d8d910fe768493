// ── Answer lifecycle ──

use tracing::{debug, info, warn};

use crate::context::OpContext;
use crate::error::{CoreError, StoreError, ValidationError};
use crate::model::{Answer, Detail};
use crate::store::{AnswerRow, Store};

impl Answer {
    /// Look the answer up by `(target, type, record_id, owner_id)`.
    pub async fn find<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        self.validate()?;

        let row = ctx.store.find_answer(&self.key()).await?;
        Self::hydrate(ctx, row).await
    }

    /// Insert the answer, and its detail if it has one, and return the
    /// stored version.
    ///
    /// If the detail cannot be stored the answer row is deleted again, so a
    /// flagged answer is never left behind without its detail.
    pub async fn create<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        self.validate_payload()?;

        let row = self.to_persisted()?;
        let stored = ctx.store.insert_answer(row).await?;
        let mut created = Self::from_persisted(stored)?;

        if created.has_details {
            if let Err(err) = created.store_details(ctx, &self.details).await {
                let id = created.id.to_string();
                if let Err(cleanup) = ctx.store.delete_answer(&id).await {
                    warn!(parent: &ctx.span, id = %id, error = %cleanup, "could not remove answer without detail");
                }
                return Err(err);
            }
        }

        info!(
            parent: &ctx.span,
            answer_target = %created.target,
            answer_type = %created.answer_type,
            id = %created.id,
            "answer created"
        );
        Ok(created)
    }

    /// Return the stored answer with this key, creating it only when the
    /// lookup matched nothing. Other lookup failures are returned as is.
    pub async fn find_or_create<S: Store + ?Sized>(
        &self,
        ctx: &OpContext<'_, S>,
    ) -> Result<Self, CoreError> {
        match self.find(ctx).await {
            Err(err) if err.is_not_found() => {
                debug!(parent: &ctx.span, key = %self.key(), "answer not found, creating");
                self.create(ctx).await
            }
            other => other,
        }
    }

    pub async fn delete<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<(), CoreError> {
        self.validate()?;

        let found = self.find(ctx).await?;
        ctx.store.delete_answer(&found.id.to_string()).await?;

        info!(parent: &ctx.span, id = %found.id, "answer deleted");
        Ok(())
    }

    /// Load the details of an answer flagged `has_details`.
    ///
    /// A flagged answer without a stored detail is an error rather than an
    /// answer with no details.
    pub async fn load_details<S: Store + ?Sized>(
        &mut self,
        ctx: &OpContext<'_, S>,
    ) -> Result<(), CoreError> {
        if !self.has_details {
            return Err(ValidationError::NoAnswerDetail.into());
        }

        let answer_id = self.id.to_string();
        let rows = ctx.store.details_for_answer(&answer_id).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound {
                entity: "answer detail",
                key: answer_id,
            }
            .into());
        }

        self.details = rows
            .into_iter()
            .map(Detail::from_persisted)
            .collect::<Result<_, _>>()?;

        Ok(())
    }

    async fn store_details<S: Store + ?Sized>(
        &mut self,
        ctx: &OpContext<'_, S>,
        details: &[Detail],
    ) -> Result<(), CoreError> {
        for detail in details {
            let mut detail = detail.clone();
            detail.attach_to(self.id);
            detail.create(ctx).await?;
        }
        self.load_details(ctx).await
    }

    pub(crate) async fn hydrate<S: Store + ?Sized>(
        ctx: &OpContext<'_, S>,
        row: AnswerRow,
    ) -> Result<Self, CoreError> {
        let mut answer = Self::from_persisted(row)?;

        if answer.has_details {
            answer.load_details(ctx).await?;
        }

        debug!(parent: &ctx.span, id = %answer.id, answer_target = %answer.target, "answer loaded");
        Ok(answer)
    }
}
