// ── Operation context ──
//
// Every entity operation receives the store it should talk to and the
// span its log events belong to. Nothing in the entity layer reads a
// process-wide logger.

use tracing::Span;

use crate::store::Store;

/// Store handle plus the observability span for one unit of work.
pub struct OpContext<'a, S: Store + ?Sized> {
    pub store: &'a S,
    pub span: Span,
}

impl<'a, S: Store + ?Sized> OpContext<'a, S> {
    pub fn new(store: &'a S, span: Span) -> Self {
        Self { store, span }
    }

    /// Context whose events are not attached to any span.
    pub fn detached(store: &'a S) -> Self {
        Self::new(store, Span::none())
    }

    /// Same span, different store (e.g. a transaction opened from this one).
    pub fn with_store<'b, T: Store + ?Sized>(&self, store: &'b T) -> OpContext<'b, T> {
        OpContext::new(store, self.span.clone())
    }
}
