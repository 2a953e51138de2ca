//! The container itself: registry of providers, per-scope value/group
//! caches, and the `Provide`/`Invoke`/`Resolve`/`Scope` surface.
//!
//! Concurrency model: each provider gets its own lock, taken only around
//! that provider's own double-checked "called" read-then-call-then-insert
//! (see `ensure_called`), never around the whole scope. Resolving a chain
//! — `A` depends on `B` depends on `C` — recurses back into
//! `ensure_called` on the same thread for each dependency in turn, each
//! time locking a *different* provider; a single provider's lock is never
//! reacquired while already held, since a provider that depended on
//! itself, even transitively, would have been rejected at `Provide` time
//! as a cycle. Nothing here executes a constructor in parallel with
//! another — there is no async or parallel execution here at all — these
//! locks exist purely to make double-checked cache reads correct under
//! concurrent callers, not to support concurrent builds.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::build::{ParamNode, ResultNode};
use crate::constructor::ConstructorFn;
use crate::error::{KeystoneError, Result};
use crate::group::Group;
use crate::key::{GroupKey, Key, KeySet, ValueKey};
use crate::object::ResultsObject;
use crate::options::{ProvideInfo, ProvideOptions};
use crate::provider::ProviderNode;
use crate::staging::Staging;

type AnyValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Registry {
    value_providers: HashMap<ValueKey, Arc<ProviderNode>>,
    group_providers: HashMap<GroupKey, Vec<Arc<ProviderNode>>>,
}

impl crate::cycle::DependencyGraph for Registry {
    fn edges(&self, key: &Key) -> Vec<Key> {
        match key {
            Key::Value(vk) => self
                .value_providers
                .get(vk)
                .map(|p| p.params.leaf_keys())
                .unwrap_or_default(),
            Key::Group(gk) => self
                .group_providers
                .get(gk)
                .map(|providers| providers.iter().flat_map(|p| p.params.leaf_keys()).collect())
                .unwrap_or_default(),
        }
    }
}

struct ScopeInner {
    name: String,
    parent: Option<Scope>,
    registry: RwLock<Registry>,
    values: RwLock<HashMap<ValueKey, AnyValue>>,
    groups: RwLock<HashMap<GroupKey, Vec<AnyValue>>>,
    called: Mutex<std::collections::HashSet<crate::provider::ProviderId>>,
    call_locks: Mutex<HashMap<crate::provider::ProviderId, Arc<Mutex<()>>>>,
    rng: Mutex<StdRng>,
}

/// A node in the scope tree. The root scope returned by
/// [`Container::new`] has no parent; every other scope is created with
/// [`Scope::scope`].
///
/// Cloning a `Scope` is cheap (it's an `Arc` handle to shared state) and
/// is how the same logical scope is threaded through recursive builds.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

/// The root of a dependency graph. A type alias for [`Scope`] — the root
/// is a scope like any other, just one with no parent.
pub type Container = Scope;

impl Scope {
    /// Creates a new root container with a fresh, unseeded RNG: group
    /// build order is randomised unless pinned with `new_seeded`.
    #[tracing::instrument(level = "debug")]
    pub fn new() -> Self {
        Self::new_with_rng(StdRng::from_entropy())
    }

    /// Creates a new root container whose group build order is
    /// deterministic for a fixed seed.
    #[tracing::instrument(level = "debug")]
    pub fn new_seeded(seed: u64) -> Self {
        Self::new_with_rng(StdRng::seed_from_u64(seed))
    }

    fn new_with_rng(rng: StdRng) -> Self {
        Scope {
            inner: Arc::new(ScopeInner {
                name: "root".to_string(),
                parent: None,
                registry: RwLock::new(Registry::default()),
                values: RwLock::new(HashMap::new()),
                groups: RwLock::new(HashMap::new()),
                called: Mutex::new(std::collections::HashSet::new()),
                call_locks: Mutex::new(HashMap::new()),
                rng: Mutex::new(rng),
            }),
        }
    }

    /// Creates a child scope: it inherits provider visibility from every
    /// ancestor but owns its own value/group caches and "called"
    /// bookkeeping.
    #[tracing::instrument(level = "debug", skip(self), fields(parent = %self.inner.name))]
    pub fn scope(&self, name: impl Into<String>) -> Scope {
        let seed = self.inner.rng.lock().next_u64_for_child();
        Scope {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                parent: Some(self.clone()),
                registry: RwLock::new(Registry::default()),
                values: RwLock::new(HashMap::new()),
                groups: RwLock::new(HashMap::new()),
                called: Mutex::new(std::collections::HashSet::new()),
                call_locks: Mutex::new(HashMap::new()),
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    // ---- Provide -------------------------------------------------------

    /// Registers a constructor producing a single unnamed value.
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide<F, Args, T>(&self, ctor: F, opts: ProvideOptions) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = T> + Send + Sync + 'static,
        Args: 'static,
        T: Send + Sync + 'static,
    {
        self.provide_named(ctor, "", opts)
    }

    /// Registers a constructor producing a single value under `name`.
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide_named<F, Args, T>(
        &self,
        ctor: F,
        name: impl Into<Cow<'static, str>>,
        opts: ProvideOptions,
    ) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = T> + Send + Sync + 'static,
        Args: 'static,
        T: Send + Sync + 'static,
    {
        let key = ValueKey::new::<T>(name.into());
        let params = F::shape();
        let results = ResultNode::Single(key.clone());
        let function_name = std::any::type_name::<F>();
        let location = Location::caller();

        let commit_key = key.clone();
        let call = Box::new(move |scope: &Scope| -> Result<()> {
            let value = ctor
                .call_with(scope)
                .map_err(|e| KeystoneError::arguments_failed(function_name, e))?;
            let mut staging = Staging::new();
            staging.put_value(commit_key.clone(), Arc::new(value));
            scope.commit(staging);
            Ok(())
        });

        let node = Arc::new(ProviderNode::new(function_name, location, params, results, call));
        self.register(node, function_name, location, opts)
    }

    /// Registers a fallible constructor producing a single value: on
    /// `Err`, the provider call fails with `ConstructorFailed` and
    /// nothing is cached, so a later call can retry the same provider.
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide_fallible<F, Args, T, E>(&self, ctor: F, opts: ProvideOptions) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = std::result::Result<T, E>> + Send + Sync + 'static,
        Args: 'static,
        T: Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let key = ValueKey::unnamed::<T>();
        let params = F::shape();
        let results = ResultNode::Single(key.clone());
        let function_name = std::any::type_name::<F>();
        let location = Location::caller();

        let commit_key = key.clone();
        let call = Box::new(move |scope: &Scope| -> Result<()> {
            let value = ctor
                .call_with(scope)
                .map_err(|e| KeystoneError::arguments_failed(function_name, e))?
                .map_err(|e| KeystoneError::constructor_failed(function_name, e))?;
            let mut staging = Staging::new();
            staging.put_value(commit_key.clone(), Arc::new(value));
            scope.commit(staging);
            Ok(())
        });

        let node = Arc::new(ProviderNode::new(function_name, location, params, results, call));
        self.register(node, function_name, location, opts)
    }

    /// Registers a constructor contributing one element to `group`.
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide_group<F, Args, T>(
        &self,
        ctor: F,
        group: impl Into<Cow<'static, str>>,
        opts: ProvideOptions,
    ) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = T> + Send + Sync + 'static,
        Args: 'static,
        T: Send + Sync + 'static,
    {
        let key = GroupKey::new::<T>(group.into());
        let params = F::shape();
        let results = ResultNode::Grouped(key.clone());
        let function_name = std::any::type_name::<F>();
        let location = Location::caller();

        let commit_key = key.clone();
        let call = Box::new(move |scope: &Scope| -> Result<()> {
            let value = ctor
                .call_with(scope)
                .map_err(|e| KeystoneError::arguments_failed(function_name, e))?;
            let mut staging = Staging::new();
            staging.add_group(commit_key.clone(), Arc::new(value));
            scope.commit(staging);
            Ok(())
        });

        let node = Arc::new(ProviderNode::new(function_name, location, params, results, call));
        self.register(node, function_name, location, opts)
    }

    /// Registers a constructor whose output is a [`ResultsObject`]: each
    /// field is scattered into its own value or group.
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide_results<F, Args, R>(&self, ctor: F, opts: ProvideOptions) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = R> + Send + Sync + 'static,
        Args: 'static,
        R: ResultsObject,
    {
        let params = F::shape();
        let results = R::shape();
        let function_name = std::any::type_name::<F>();
        let location = Location::caller();

        let call = Box::new(move |scope: &Scope| -> Result<()> {
            let value = ctor
                .call_with(scope)
                .map_err(|e| KeystoneError::arguments_failed(function_name, e))?;
            let mut staging = Staging::new();
            value.scatter(&mut staging);
            scope.commit(staging);
            Ok(())
        });

        let node = Arc::new(ProviderNode::new(function_name, location, params, results, call));
        self.register(node, function_name, location, opts)
    }

    /// Fallible counterpart of [`Scope::provide_results`].
    #[track_caller]
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn provide_results_fallible<F, Args, R, E>(&self, ctor: F, opts: ProvideOptions) -> Result<ProvideInfo>
    where
        F: ConstructorFn<Args, Output = std::result::Result<R, E>> + Send + Sync + 'static,
        Args: 'static,
        R: ResultsObject,
        E: std::error::Error + Send + Sync + 'static,
    {
        let params = F::shape();
        let results = R::shape();
        let function_name = std::any::type_name::<F>();
        let location = Location::caller();

        let call = Box::new(move |scope: &Scope| -> Result<()> {
            let value = ctor
                .call_with(scope)
                .map_err(|e| KeystoneError::arguments_failed(function_name, e))?
                .map_err(|e| KeystoneError::constructor_failed(function_name, e))?;
            let mut staging = Staging::new();
            value.scatter(&mut staging);
            scope.commit(staging);
            Ok(())
        });

        let node = Arc::new(ProviderNode::new(function_name, location, params, results, call));
        self.register(node, function_name, location, opts)
    }

    /// Tentatively inserts `node`, runs the cycle check from every key it
    /// produces, rolls back on conflict or cycle, and (when
    /// `opts.export`) repeats registration in every ancestor scope.
    fn register(
        &self,
        node: Arc<ProviderNode>,
        function_name: &'static str,
        location: &'static Location<'static>,
        opts: ProvideOptions,
    ) -> Result<ProvideInfo> {
        let produced = node.results.all_keys(function_name);

        // A single result tree must not claim the same ValueKey twice —
        // e.g. two unnamed fields of the same type in one `ResultsObject`.
        let mut seen = KeySet::new();
        for (value_key, source) in node.results.value_keys(function_name) {
            if let Err(conflict) = seen.insert(value_key, source) {
                return Err(KeystoneError::provide(function_name, conflict.to_string()));
            }
        }

        {
            let mut registry = self.inner.registry.write();

            // At most one provider may ever claim a given ValueKey.
            for (value_key, _source) in node.results.value_keys(function_name) {
                if let Some(existing) = registry.value_providers.get(&value_key) {
                    return Err(KeystoneError::provide(
                        function_name,
                        format!(
                            "{value_key} is already provided by {}",
                            existing.function_name
                        ),
                    ));
                }
            }

            // Tentative insert.
            for (value_key, _) in node.results.value_keys(function_name) {
                registry.value_providers.insert(value_key, node.clone());
            }
            for group_key in node.results.group_keys() {
                registry
                    .group_providers
                    .entry(group_key)
                    .or_default()
                    .push(node.clone());
            }

            // invariant: no cycles. Check from every key the new node adds.
            for key in &produced {
                if let Some(cycle) = crate::cycle::check(&*registry, key) {
                    Self::unregister_locked(&mut registry, &node, function_name);
                    return Err(KeystoneError::CycleDetected {
                        function: function_name.to_string(),
                        path: cycle,
                    });
                }
            }
        }

        // `self`'s insert is now committed. If exporting to the parent
        // fails (a conflicting key or a cycle in the parent's own graph),
        // roll it back here too so a failing `Provide` leaves every scope
        // it touched exactly as it found it, not just the innermost one.
        if opts.export {
            if let Some(parent) = self.inner.parent.clone() {
                if let Err(e) = parent.register(node.clone(), function_name, location, opts) {
                    let mut registry = self.inner.registry.write();
                    Self::unregister_locked(&mut registry, &node, function_name);
                    return Err(e);
                }
            }
        }

        Ok(ProvideInfo {
            function: function_name,
            keys: produced,
            location,
        })
    }

    /// Removes every tentative insert `node` made in `registry`. Shared by
    /// the cycle-check rollback and the export-failure rollback so a
    /// failing `Provide` never leaves a partial registration behind in
    /// any scope it touched.
    fn unregister_locked(registry: &mut Registry, node: &Arc<ProviderNode>, function_name: &'static str) {
        for (value_key, _) in node.results.value_keys(function_name) {
            registry.value_providers.remove(&value_key);
        }
        for group_key in node.results.group_keys() {
            if let Some(list) = registry.group_providers.get_mut(&group_key) {
                list.retain(|p| p.id != node.id);
            }
        }
    }

    // ---- Invoke ---------------------------------------------------------

    /// Calls `f`, building its arguments from the container, for side
    /// effect.
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn invoke<F, Args>(&self, f: F) -> Result<()>
    where
        F: ConstructorFn<Args, Output = ()> + 'static,
        Args: 'static,
    {
        let function_name = std::any::type_name::<F>();
        self.check_required(F::shape(), function_name)?;
        f.call_with(self)
            .map_err(|e| KeystoneError::arguments_failed(function_name, e))
    }

    /// Fallible counterpart of [`Scope::invoke`]: `f`'s own trailing error
    /// is wrapped as `ConstructorFailed`; a failure while building its
    /// arguments is wrapped as `ArgumentsFailed` instead.
    #[tracing::instrument(level = "debug", skip_all, fields(scope = %self.inner.name, function = %std::any::type_name::<F>()))]
    pub fn invoke_fallible<F, Args, E>(&self, f: F) -> Result<()>
    where
        F: ConstructorFn<Args, Output = std::result::Result<(), E>> + 'static,
        Args: 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let function_name = std::any::type_name::<F>();
        self.check_required(F::shape(), function_name)?;
        f.call_with(self)
            .map_err(|e| KeystoneError::arguments_failed(function_name, e))?
            .map_err(|e| KeystoneError::constructor_failed(function_name, e))
    }

    fn check_required(&self, params: ParamNode, function_name: &'static str) -> Result<()> {
        let missing: Vec<Key> = params
            .required_value_keys()
            .into_iter()
            .filter(|key| self.find_value_provider(key).is_none())
            .map(Key::Value)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(KeystoneError::missing(function_name, missing))
        }
    }

    // ---- Resolve ---------------------------------------------------------

    /// Resolves the unnamed value of type `T`.
    #[tracing::instrument(level = "trace", skip(self), fields(scope = %self.inner.name, type_name = %std::any::type_name::<T>()))]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve_value(&ValueKey::unnamed::<T>())
    }

    #[tracing::instrument(level = "trace", skip(self), fields(scope = %self.inner.name, key = %key))]
    pub fn resolve_value<T: Send + Sync + 'static>(&self, key: &ValueKey) -> Result<Arc<T>> {
        if let Some(value) = self.cached_value(key) {
            return Ok(downcast(value));
        }

        let provider = self.find_value_provider(key).ok_or_else(|| {
            KeystoneError::missing(
                format!("resolve {key}"),
                vec![Key::Value(key.clone())],
            )
        })?;

        self.ensure_called(&provider)?;

        let value = self
            .cached_value(key)
            .expect("a successful provider call commits its produced key");
        Ok(downcast(value))
    }

    pub fn try_resolve_value<T: Send + Sync + 'static>(&self, key: &ValueKey) -> Option<Arc<T>> {
        self.resolve_value(key).ok()
    }

    /// Resolves every contribution to `group`, in the order the scope's
    /// RNG happened to call their providers.
    #[tracing::instrument(level = "trace", skip(self), fields(scope = %self.inner.name, group = group))]
    pub fn resolve_group<T: Send + Sync + 'static>(&self, group: &str) -> Result<Group<T>> {
        let key = GroupKey::new::<T>(group.to_string());
        let providers = self.find_group_providers(&key);

        let mut shuffled = providers;
        shuffled.shuffle(&mut *self.inner.rng.lock());

        for provider in &shuffled {
            self.ensure_called(provider)?;
        }

        let groups = self.inner.groups.read();
        let values = groups
            .get(&key)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(downcast::<T>)
            .collect();
        Ok(Group::new(values))
    }

    fn ensure_called(&self, provider: &Arc<ProviderNode>) -> Result<()> {
        if self.inner.called.lock().contains(&provider.id) {
            return Ok(());
        }

        // Lock this provider alone, not the whole scope: `provider.call`
        // below can recurse back into `ensure_called` for a dependency,
        // which must be free to take its own (different) provider's lock
        // on the same thread without deadlocking against this one.
        let provider_lock = self
            .inner
            .call_locks
            .lock()
            .entry(provider.id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = provider_lock.lock();

        if self.inner.called.lock().contains(&provider.id) {
            return Ok(());
        }

        let missing: Vec<Key> = provider
            .params
            .required_value_keys()
            .into_iter()
            .filter(|key| self.find_value_provider(key).is_none())
            .map(Key::Value)
            .collect();
        if !missing.is_empty() {
            return Err(KeystoneError::missing(provider.function_name, missing));
        }

        // `call` already classifies its own failure as `ArgumentsFailed`
        // or `ConstructorFailed`; nothing left to wrap here.
        provider.call(self)?;

        self.inner.called.lock().insert(provider.id);
        Ok(())
    }

    fn commit(&self, staging: Staging) {
        let (values, groups) = staging.into_parts();
        self.inner.values.write().extend(values);
        let mut own_groups = self.inner.groups.write();
        for (key, mut elements) in groups {
            own_groups.entry(key).or_default().append(&mut elements);
        }
    }

    fn cached_value(&self, key: &ValueKey) -> Option<AnyValue> {
        self.inner.values.read().get(key).cloned()
    }

    fn find_value_provider(&self, key: &ValueKey) -> Option<Arc<ProviderNode>> {
        if let Some(p) = self.inner.registry.read().value_providers.get(key).cloned() {
            return Some(p);
        }
        self.inner.parent.as_ref().and_then(|p| p.find_value_provider(key))
    }

    fn find_group_providers(&self, key: &GroupKey) -> Vec<Arc<ProviderNode>> {
        let mut providers = self
            .inner
            .registry
            .read()
            .group_providers
            .get(key)
            .cloned()
            .unwrap_or_default();
        if let Some(parent) = &self.inner.parent {
            providers.extend(parent.find_group_providers(key));
        }
        providers
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<T: Send + Sync + 'static>(value: AnyValue) -> Arc<T> {
    value
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("value cached under a key of type {} had a different concrete type — this is a container bug", std::any::type_name::<T>()))
}

/// Small helper so each scope's RNG can deterministically seed its
/// children without making `rand::Rng` part of this module's public
/// surface.
trait ChildSeed {
    fn next_u64_for_child(&mut self) -> u64;
}

impl ChildSeed for StdRng {
    fn next_u64_for_child(&mut self) -> u64 {
        use rand::RngCore;
        self.next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;

    struct Greeting(String);
    struct Counter(std::sync::atomic::AtomicUsize);

    #[test]
    fn singleton_is_built_at_most_once() {
        let container = Container::new();
        let calls = StdArc::new(std::sync::atomic::AtomicUsize::new(0));
        let calls_clone = calls.clone();
        container
            .provide(
                move || {
                    calls_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Greeting("hi".to_string())
                },
                ProvideOptions::default(),
            )
            .unwrap();

        let a = container.resolve::<Greeting>().unwrap();
        let b = container.resolve::<Greeting>().unwrap();
        assert_eq!(a.0, "hi");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn resolving_unregistered_type_is_missing_dependency() {
        let container = Container::new();
        let err = container.resolve::<Greeting>().unwrap_err();
        assert!(err.is_missing_dependencies());
    }

    #[test]
    fn duplicate_value_provider_is_rejected() {
        let container = Container::new();
        container
            .provide(|| Greeting("a".into()), ProvideOptions::default())
            .unwrap();
        let err = container
            .provide(|| Greeting("b".into()), ProvideOptions::default())
            .unwrap_err();
        assert!(matches!(err, KeystoneError::ProvideError { .. }));
    }

    #[test]
    fn cycle_between_two_providers_is_rejected() {
        struct A;
        struct B;
        let container = Container::new();
        container
            .provide(|_b: Arc<B>| A, ProvideOptions::default())
            .unwrap();
        let err = container
            .provide(|_a: Arc<A>| B, ProvideOptions::default())
            .unwrap_err();
        assert!(matches!(err, KeystoneError::CycleDetected { .. }));
    }

    #[test]
    fn child_scope_caches_independently_from_parent() {
        let root = Container::new();
        let calls = StdArc::new(Counter(std::sync::atomic::AtomicUsize::new(0)));
        let calls_clone = calls.clone();
        root.provide(
            move || {
                calls_clone.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Greeting("scoped".into())
            },
            ProvideOptions::default(),
        )
        .unwrap();

        let child = root.scope("request");
        let from_root = root.resolve::<Greeting>().unwrap();
        let from_child = child.resolve::<Greeting>().unwrap();
        assert_eq!(from_root.0, from_child.0);
        assert!(!Arc::ptr_eq(&from_root, &from_child));
        assert_eq!(calls.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn value_group_collects_every_contribution() {
        let container = Container::new();
        container
            .provide_group(|| 1i32, "nums", ProvideOptions::default())
            .unwrap();
        container
            .provide_group(|| 2i32, "nums", ProvideOptions::default())
            .unwrap();
        let group = container.resolve_group::<i32>("nums").unwrap();
        let mut values: Vec<i32> = group.iter().map(|v| **v).collect();
        values.sort();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn seeded_containers_shuffle_groups_deterministically() {
        let build = || {
            let container = Container::new_seeded(7);
            for i in 0..5i32 {
                container
                    .provide_group(move || i, "nums", ProvideOptions::default())
                    .unwrap();
            }
            let group = container.resolve_group::<i32>("nums").unwrap();
            group.iter().map(|v| **v).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn resolving_a_three_level_chain_does_not_deadlock() {
        struct Logger;
        struct Greeter(Arc<Logger>);
        struct App(Arc<Greeter>);

        let container = Container::new();
        container.provide(|| Logger, ProvideOptions::default()).unwrap();
        container
            .provide(|l: Arc<Logger>| Greeter(l), ProvideOptions::default())
            .unwrap();
        container
            .provide(|g: Arc<Greeter>| App(g), ProvideOptions::default())
            .unwrap();

        let app = container.resolve::<App>().unwrap();
        let _ = &app.0 .0;
    }

    #[test]
    fn failed_export_rolls_back_the_childs_own_tentative_insert() {
        struct Existing;

        let root = Container::new();
        // Occupies Existing's ValueKey in the parent so the export below collides.
        root.provide(|| Existing, ProvideOptions::default()).unwrap();

        let child = root.scope("request");
        child
            .provide(|| Existing, ProvideOptions { export: true })
            .unwrap_err();

        // If the child's own tentative insert hadn't been rolled back, this
        // second, unexported attempt would fail with "already provided by"
        // against the orphaned entry left behind by the failed export.
        child
            .provide(|| Existing, ProvideOptions::default())
            .expect("child registry must be exactly as it was before the failed export");
    }
}
