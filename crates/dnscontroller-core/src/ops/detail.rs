// ── Detail lifecycle ──
//
// Keyed by the owning answer's id. The detail's own id must already be set
// when any of these run; `Detail::new` and `Detail::attach_to` take care of
// that before `create` is reached.

use tracing::{debug, info};

use crate::context::OpContext;
use crate::error::CoreError;
use crate::model::Detail;
use crate::store::Store;

impl Detail {
    pub async fn find<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        self.validate()?;

        let row = ctx.store.find_detail(&self.answer_id.to_string()).await?;
        Self::from_persisted(row)
    }

    pub async fn create<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<Self, CoreError> {
        let row = self.to_persisted()?;
        let stored = ctx.store.insert_detail(row).await?;

        let detail = Self::from_persisted(stored)?;
        debug!(parent: &ctx.span, id = %detail.id, answer_id = %detail.answer_id, "detail created");
        Ok(detail)
    }

    pub async fn find_or_create<S: Store + ?Sized>(
        &self,
        ctx: &OpContext<'_, S>,
    ) -> Result<Self, CoreError> {
        match self.find(ctx).await {
            Err(err) if err.is_not_found() => self.create(ctx).await,
            other => other,
        }
    }

    pub async fn delete<S: Store + ?Sized>(&self, ctx: &OpContext<'_, S>) -> Result<(), CoreError> {
        self.validate()?;

        let found = self.find(ctx).await?;
        ctx.store.delete_detail(&found.id.to_string()).await?;

        info!(parent: &ctx.span, id = %found.id, answer_id = %found.answer_id, "detail deleted");
        Ok(())
    }
}
