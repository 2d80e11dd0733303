//! Server runtime for extension orchestration.
//!
//! The [`Server`] is the composition root of the management model. It owns
//! every registry, resource definition and runtime service, and hands them to
//! management operations by reference.
//!
//! # Lifecycle
//!
//! 1. **Dependency Resolution** - Validate and topologically sort extensions
//! 2. **Build Phase** - Call `extension.build()` in dependency order
//! 3. **Ready Phase** - Call `extension.ready()` in dependency order
//! 4. **Cleanup Phase** - Call `extension.cleanup()` in reverse order
//!
//! # Staging vs Global Services
//!
//! ```ignore
//! fn build(&self, server: &mut Server) {
//!     // Staged: other extensions may still contribute during build.
//!     server.insert_service(ManagementModel::new());
//! }
//!
//! fn ready(&self, server: &mut Server) {
//!     // Frozen: shared read-only from now on.
//!     let model = server.remove_service::<ManagementModel>().unwrap();
//!     server.insert_global(model);
//! }
//! ```

use crate::extension::{Extension, ExtensionId, Extensions};
use crate::service::{GlobalService, Service, ServiceRef, ServiceRefMut, Services};
use hashbrown::{HashMap, HashSet};

/// Build state of the server: `NotStarted` → `Building` → `Built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BuildState {
    #[default]
    NotStarted,
    Building,
    Built,
}

/// The runtime that orchestrates extensions and owns their services.
///
/// # Example
///
/// ```
/// use mgmt_system::server::Server;
///
/// let mut server = Server::new();
/// server.finish();
/// assert!(server.is_built());
/// ```
pub struct Server {
    /// Services shared with management operations once the server is ready.
    global: Services,

    /// Services staged during build. Not visible to management operations.
    staging: Services,

    /// Extensions pending build (not yet sorted).
    pending: Vec<ExtensionEntry>,

    /// Extensions that have been built, in sorted order.
    built: Vec<ExtensionEntry>,

    /// Extension IDs added so far (duplicate detection).
    extension_ids: HashSet<ExtensionId>,

    build_state: BuildState,
}

struct ExtensionEntry {
    id: ExtensionId,
    extension: Box<dyn Extension>,
    name: String,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Server {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self
            .pending
            .iter()
            .chain(self.built.iter())
            .map(|e| e.name.as_str())
            .collect();
        f.debug_struct("Server")
            .field("extensions", &names)
            .field("build_state", &self.build_state)
            .finish()
    }
}

impl Server {
    /// Creates a new empty server.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global: Services::new(),
            staging: Services::new(),
            pending: Vec::new(),
            built: Vec::new(),
            extension_ids: HashSet::new(),
            build_state: BuildState::NotStarted,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extension Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds one extension or an extension group to the server.
    ///
    /// # Panics
    ///
    /// Panics if a unique extension is added twice.
    pub fn add_extensions<E: Extensions>(&mut self, extensions: E) -> &mut Self {
        extensions.add_to_server(self);
        self
    }

    pub(crate) fn add_extension_boxed(&mut self, id: ExtensionId, extension: Box<dyn Extension>) {
        let name = extension.name().to_string();

        if extension.is_unique() && self.extension_ids.contains(&id) {
            panic!(
                "Extension '{}' is unique and was already added.\n\
                 If you intended to add this extension multiple times, \
                 set `is_unique()` to return `false`.",
                name
            );
        }
        self.extension_ids.insert(id);

        let entry = ExtensionEntry {
            id,
            extension,
            name,
        };
        if self.build_state == BuildState::Building {
            entry.extension.build(self);
            self.built.push(entry);
        } else {
            self.pending.push(entry);
        }
    }

    /// Returns true if an extension of the given type has been added.
    #[must_use]
    pub fn has_extension<E: Extension>(&self) -> bool {
        self.extension_ids.contains(&ExtensionId::of::<E>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Staged Services
    // ─────────────────────────────────────────────────────────────────────────

    /// Stages a service that other extensions may mutate during build.
    pub fn insert_service<S: Service>(&mut self, service: S) -> Option<S> {
        self.staging.insert(service)
    }

    /// Returns true if a staged service of type `S` exists.
    #[must_use]
    pub fn contains_service<S: Service>(&self) -> bool {
        self.staging.contains::<S>()
    }

    /// Gets an immutable reference to a staged service.
    #[must_use]
    pub fn get_service<S: Service>(&self) -> Option<ServiceRef<'_, S>> {
        self.staging.get::<S>().ok()
    }

    /// Gets a mutable reference to a staged service.
    ///
    /// Returns `None` if the service doesn't exist or is already borrowed.
    #[must_use]
    pub fn get_service_mut<S: Service>(&self) -> Option<ServiceRefMut<'_, S>> {
        self.staging.get_mut::<S>().ok()
    }

    /// Removes a staged service and returns it.
    pub fn remove_service<S: Service>(&mut self) -> Option<S> {
        self.staging.remove::<S>()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Global Services
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a global service shared with every management operation.
    pub fn insert_global<S: GlobalService>(&mut self, service: S) -> Option<S> {
        self.global.insert(service)
    }

    /// Returns true if a global service of type `S` exists.
    #[must_use]
    pub fn contains_global<S: GlobalService>(&self) -> bool {
        self.global.contains::<S>()
    }

    /// Gets an immutable reference to a global service.
    #[must_use]
    pub fn get_global<S: GlobalService>(&self) -> Option<ServiceRef<'_, S>> {
        self.global.get::<S>().ok()
    }

    /// Returns the global services container.
    #[must_use]
    pub fn global_services(&self) -> &Services {
        &self.global
    }

    /// Returns whether `finish()` has completed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.build_state == BuildState::Built
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Builds and readies every extension.
    ///
    /// # Panics
    ///
    /// - If an extension's dependency is not satisfied
    /// - If there is a circular dependency between extensions
    /// - If called more than once
    pub fn finish(&mut self) {
        if self.build_state != BuildState::NotStarted {
            panic!("Server::finish() was already called. Cannot build twice.");
        }

        let sorted = self.sort_by_dependencies();

        self.build_state = BuildState::Building;
        for entry in sorted {
            tracing::debug!(extension = %entry.name, "building extension");
            entry.extension.build(self);
            self.built.push(entry);
        }

        // Extensions added from ready() are queued, not built.
        self.build_state = BuildState::Built;
        let built = core::mem::take(&mut self.built);
        for entry in &built {
            entry.extension.ready(self);
        }
        self.built = built;

        tracing::info!(extensions = self.built.len(), "server ready");
    }

    /// Alias for [`finish()`](Self::finish).
    pub fn run(&mut self) {
        self.finish();
    }

    /// Cleans up all extensions in reverse dependency order.
    pub fn cleanup(&mut self) {
        let built = core::mem::take(&mut self.built);
        for entry in built.iter().rev() {
            entry.extension.cleanup(self);
        }
        self.built = built;
    }

    /// Kahn's algorithm over the pending extensions.
    fn sort_by_dependencies(&mut self) -> Vec<ExtensionEntry> {
        let n = self.pending.len();
        if n == 0 {
            return Vec::new();
        }

        let id_to_index: HashMap<ExtensionId, usize> = self
            .pending
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id, i))
            .collect();

        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, entry) in self.pending.iter().enumerate() {
            for dep in entry.extension.dependencies() {
                match id_to_index.get(&dep) {
                    Some(&dep_idx) => {
                        dependents[dep_idx].push(i);
                        in_degree[i] += 1;
                    }
                    None if self.built.iter().any(|b| b.id == dep) => {}
                    None => panic!(
                        "Extension '{}' requires '{}' which was not added.",
                        entry.name,
                        dep.type_name()
                    ),
                }
            }
        }

        let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).rev().collect();
        let mut order: Vec<usize> = Vec::with_capacity(n);
        while let Some(idx) = queue.pop() {
            order.push(idx);
            for &dependent in dependents[idx].iter().rev() {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push(dependent);
                }
            }
        }

        if order.len() != n {
            let in_cycle: Vec<&str> = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.pending[i].name.as_str())
                .collect();
            panic!("Circular dependency detected among extensions: {:?}", in_cycle);
        }

        let mut slots: Vec<Option<ExtensionEntry>> =
            core::mem::take(&mut self.pending).into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Journal(Mutex<Vec<String>>);
    impl GlobalService for Journal {}

    struct Recording {
        label: &'static str,
        journal: Arc<Journal>,
    }

    fn record(journal: &Journal, entry: String) {
        journal.0.lock().push(entry);
    }

    struct First(Recording);
    impl Extension for First {
        fn build(&self, _server: &mut Server) {
            record(&self.0.journal, format!("build:{}", self.0.label));
        }
        fn ready(&self, _server: &mut Server) {
            record(&self.0.journal, format!("ready:{}", self.0.label));
        }
        fn cleanup(&self, _server: &mut Server) {
            record(&self.0.journal, format!("cleanup:{}", self.0.label));
        }
    }

    struct Second(Recording);
    impl Extension for Second {
        fn build(&self, _server: &mut Server) {
            record(&self.0.journal, format!("build:{}", self.0.label));
        }
        fn ready(&self, _server: &mut Server) {
            record(&self.0.journal, format!("ready:{}", self.0.label));
        }
        fn cleanup(&self, _server: &mut Server) {
            record(&self.0.journal, format!("cleanup:{}", self.0.label));
        }
        fn dependencies(&self) -> Vec<ExtensionId> {
            vec![ExtensionId::of::<First>()]
        }
    }

    #[test]
    fn lifecycle_runs_in_dependency_order() {
        let journal = Arc::new(Journal::default());
        let mut server = Server::new();
        // Added out of order on purpose.
        server.add_extensions(Second(Recording {
            label: "second",
            journal: Arc::clone(&journal),
        }));
        server.add_extensions(First(Recording {
            label: "first",
            journal: Arc::clone(&journal),
        }));
        server.finish();
        server.cleanup();

        let entries = journal.0.lock().clone();
        assert_eq!(
            entries,
            vec![
                "build:first",
                "build:second",
                "ready:first",
                "ready:second",
                "cleanup:second",
                "cleanup:first",
            ]
        );
    }

    struct Staging;
    impl Extension for Staging {
        fn build(&self, server: &mut Server) {
            server.insert_service(vec![1u32]);
        }
        fn ready(&self, server: &mut Server) {
            let staged = server
                .remove_service::<Vec<u32>>()
                .expect("staged during build");
            server.insert_global(Frozen(staged));
        }
    }

    struct Contributor;
    impl Extension for Contributor {
        fn build(&self, server: &mut Server) {
            server
                .get_service_mut::<Vec<u32>>()
                .expect("Staging must be added first")
                .push(2);
        }
        fn dependencies(&self) -> Vec<ExtensionId> {
            vec![ExtensionId::of::<Staging>()]
        }
    }

    struct Frozen(Vec<u32>);
    impl GlobalService for Frozen {}

    #[test]
    fn staged_service_is_frozen_on_ready() {
        let mut server = Server::new();
        server.add_extensions(Contributor).add_extensions(Staging);
        server.finish();

        assert!(!server.contains_service::<Vec<u32>>());
        assert_eq!(server.get_global::<Frozen>().unwrap().0, vec![1, 2]);
    }

    struct Named;
    impl Extension for Named {
        fn build(&self, server: &mut Server) {
            server.insert_service(vec![7u32]);
        }
        fn name(&self) -> &str {
            "test::named"
        }
    }

    struct NeedsNamed;
    impl Extension for NeedsNamed {
        fn build(&self, server: &mut Server) {
            server
                .get_service_mut::<Vec<u32>>()
                .expect("Named must be built first")
                .push(8);
        }
        fn name(&self) -> &str {
            "test::needs_named"
        }
        fn dependencies(&self) -> Vec<ExtensionId> {
            vec![ExtensionId::of::<Named>()]
        }
    }

    #[test]
    fn dependencies_resolve_by_type_not_display_name() {
        let mut server = Server::new();
        server.add_extensions(NeedsNamed).add_extensions(Named);
        server.finish();

        assert_eq!(*server.get_service::<Vec<u32>>().unwrap(), vec![7, 8]);
    }

    #[test]
    #[should_panic(expected = "was not added")]
    fn missing_dependency_panics() {
        let mut server = Server::new();
        server.add_extensions(Contributor);
        server.finish();
    }

    #[test]
    #[should_panic(expected = "already added")]
    fn duplicate_unique_extension_panics() {
        let mut server = Server::new();
        server.add_extensions(Staging).add_extensions(Staging);
    }

    #[test]
    #[should_panic(expected = "already called")]
    fn finish_twice_panics() {
        let mut server = Server::new();
        server.finish();
        server.finish();
    }
}
