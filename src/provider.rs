//! A single registered provider: the reflected shape of a constructor
//! plus a type-erased closure that builds its arguments, calls it, and
//! stages its output.
//!
//! Idempotence ("called at most once per scope") and the decision of
//! *which* scope's caches a call commits into both live in
//! [`crate::container::Scope`] — a `ProviderNode` is a shared, read-only
//! recipe that can be invoked on behalf of any descendant scope that
//! inherits it, so "called" can't be a flag on the node itself: a
//! constructor re-called from a child scope produces a separate cached
//! value there, not a shared one.

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::build::{ParamNode, ResultNode};
use crate::container::Scope;
use crate::error::Result;

pub type ProviderId = usize;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn next_provider_id() -> ProviderId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Everything the container knows about one `Provide`-registered
/// constructor.
pub struct ProviderNode {
    pub id: ProviderId,
    pub function_name: &'static str,
    pub location: &'static Location<'static>,
    pub params: ParamNode,
    pub results: ResultNode,
    call: Box<dyn Fn(&Scope) -> Result<()> + Send + Sync>,
}

impl ProviderNode {
    pub fn new(
        function_name: &'static str,
        location: &'static Location<'static>,
        params: ParamNode,
        results: ResultNode,
        call: Box<dyn Fn(&Scope) -> Result<()> + Send + Sync>,
    ) -> Self {
        ProviderNode {
            id: next_provider_id(),
            function_name,
            location,
            params,
            results,
            call,
        }
    }

    /// Builds arguments against `scope`, calls the constructor, and — on
    /// success — commits its staged output into `scope`. Does not check
    /// or update "called" state; the caller (`Scope::ensure_called`) owns
    /// that so it can hold a single lock across the check-then-call.
    #[tracing::instrument(level = "debug", skip(self, scope), fields(function = self.function_name))]
    pub fn call(&self, scope: &Scope) -> Result<()> {
        (self.call)(scope)
    }
}
