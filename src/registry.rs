//! Process-wide registration point consulted by the host debugger.
//!
//! The host asks two questions while formatting values and evaluating
//! expressions: "is there a renderer for this value?" and "is there a
//! synthetic method for this (type, name) pair?". Both are answered by a
//! [`Registry`], either one installed explicitly by the host adapter at
//! plugin-load time or, failing that, a builtin default covering the
//! standard wrapper family table.
//!
//! Both queries are pure lookups with no mutation of debuggee state, and
//! both are total over arbitrary, unrelated input: the host calls them for
//! every type and value it ever displays, so an unrecognized input returns
//! `None` instead of failing.

use alloc::{
    borrow::Cow,
    boxed::Box,
    string::{String, ToString},
};
use core::{
    fmt,
    ptr::NonNull,
    sync::atomic::{AtomicPtr, Ordering},
};

use hashbrown::HashMap;

use crate::{
    family::{WRAPPER_FAMILIES, WrapperFamily},
    host::HostValue,
    matcher::{self, WrapperTypeDescriptor},
    render::WrapperRenderer,
    worker::{AccessorWorker, Operation},
};

#[cfg(feature = "std")]
use std::sync as lock_impl;

#[cfg(not(feature = "std"))]
use spin as lock_impl;

type CacheMap = HashMap<String, Option<WrapperTypeDescriptor>, rustc_hash::FxBuildHasher>;

/// Memoized matcher verdicts keyed by raw type name.
///
/// Matching is a pure function of the family table and the name, so a
/// cached verdict never goes stale. Negative verdicts are cached too: the
/// overwhelming majority of the types a debugger displays are unrelated to
/// the wrapper family, and each of them is asked about repeatedly.
struct DescriptorCache(lock_impl::RwLock<Option<CacheMap>>);

impl DescriptorCache {
    const fn new() -> Self {
        Self(lock_impl::RwLock::new(None))
    }

    fn lookup(&self, type_name: &str) -> Option<Option<WrapperTypeDescriptor>> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        #[cfg(feature = "std")]
        let guard = self.0.read().expect("unable to acquire descriptor cache");

        guard.as_ref()?.get(type_name).cloned()
    }

    fn store(&self, type_name: String, verdict: Option<WrapperTypeDescriptor>) {
        #[cfg(not(feature = "std"))]
        let mut guard = self.0.write();

        #[cfg(feature = "std")]
        let mut guard = self.0.write().expect("unable to acquire descriptor cache");

        guard.get_or_insert_default().insert(type_name, verdict);
    }
}

/// The set of wrapper families the plugin answers queries about.
///
/// A registry is built once, installed globally with [`install`], and read
/// for the remainder of the debugger session; there is no teardown. Matching
/// is attempted against the registered families in registration order, first
/// match wins.
///
/// # Examples
///
/// The builtin table covers both standard family members:
///
/// ```
/// use polyprobe::registry::Registry;
///
/// let registry = Registry::new();
/// assert!(registry.match_type("isocpp_p0201::polymorphic<Base>").is_some());
/// assert!(registry.match_type("isocpp_p0201::polymorphic_value<Base>").is_some());
/// ```
///
/// Structurally identical wrappers living under other names can be added
/// builder-style:
///
/// ```
/// use polyprobe::{FamilyTag, Registry, WrapperFamily};
///
/// let registry = Registry::empty().family(WrapperFamily {
///     tag: FamilyTag::PolymorphicValue,
///     namespace: "mylib",
///     name: "box_poly",
///     handle_field: "inner_",
/// });
/// assert!(registry.match_type("mylib::box_poly<Shape>").is_some());
/// assert!(registry.match_type("isocpp_p0201::polymorphic<Shape>").is_none());
/// ```
///
/// [`install`]: Registry::install
pub struct Registry {
    families: Cow<'static, [WrapperFamily]>,
    descriptors: DescriptorCache,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Creates a registry preloaded with the builtin family table,
    /// [`WRAPPER_FAMILIES`].
    pub const fn new() -> Self {
        Self {
            families: Cow::Borrowed(WRAPPER_FAMILIES),
            descriptors: DescriptorCache::new(),
        }
    }

    /// Creates a registry with no registered families.
    pub const fn empty() -> Self {
        Self {
            families: Cow::Borrowed(&[]),
            descriptors: DescriptorCache::new(),
        }
    }

    /// Registers an additional wrapper family, builder-style.
    pub fn family(mut self, family: WrapperFamily) -> Self {
        self.families.to_mut().push(family);
        self
    }

    /// Matches a type name against the registered families.
    ///
    /// Verdicts are memoized by raw type name, which is sound because
    /// matching is a pure function of the family table and the name. Names
    /// that do not match any family, including malformed near-misses, yield
    /// `None`.
    pub fn match_type(&self, type_name: &str) -> Option<WrapperTypeDescriptor> {
        let type_name = type_name.trim();
        if let Some(verdict) = self.descriptors.lookup(type_name) {
            return verdict;
        }
        let verdict = matcher::match_any(&self.families, type_name);
        self.descriptors
            .store(type_name.to_string(), verdict.clone());
        verdict
    }

    /// Finds a renderer applicable to `value`, if any.
    ///
    /// Applicability is decided purely by the value's declared type name.
    pub fn find_renderer<V: HostValue>(&self, value: &V) -> Option<WrapperRenderer> {
        let descriptor = self.match_type(value.type_name().as_ref())?;
        Some(WrapperRenderer::new(descriptor))
    }

    /// Finds a worker for a (type, method name) pair, if any.
    ///
    /// Returns `None` when either the type is not a recognized wrapper or
    /// the method name is not one of the two supported synthetic
    /// operations.
    pub fn find_worker(&self, type_name: &str, method_name: &str) -> Option<AccessorWorker> {
        let operation = Operation::from_method_name(method_name)?;
        let descriptor = self.match_type(type_name)?;
        Some(AccessorWorker::new(descriptor, operation))
    }

    /// Installs this registry globally.
    ///
    /// Installation happens exactly once, at plugin-load time; if a registry
    /// is already installed, returns [`RegistryAlreadyInstalledError`]
    /// containing the registry that was attempted to be installed, allowing
    /// the caller to recover it.
    ///
    /// The installed registry is leaked into static memory and remains for
    /// the lifetime of the process. The hosting debugger session owns the
    /// process lifetime, so no teardown surface exists.
    pub fn install(self) -> Result<(), RegistryAlreadyInstalledError> {
        let boxed = Box::into_raw(Box::new(self));

        // SAFETY:
        //
        // 1. The pointer `boxed` is valid and was obtained from `Box::into_raw`.
        // 2. On success, the pointer will not be used anymore.
        // 3. On failure, the pointer remains owned by us.
        let install_result = unsafe { GLOBAL.install(boxed) };

        match install_result {
            Ok(()) => Ok(()),
            Err(()) => {
                // SAFETY:
                //
                // - This pointer was obtained from Box::into_raw above, so it is
                //   valid to convert it back into a Box.
                // - Since installation failed, we still own the pointer, so it is
                //   safe to reclaim it here.
                let registry = unsafe { Box::from_raw(boxed) };

                Err(RegistryAlreadyInstalledError(*registry))
            }
        }
    }

    /// Fetches the globally installed registry, if any.
    pub fn installed() -> Option<&'static Registry> {
        let ptr = GLOBAL.fetch()?;

        // SAFETY:
        //
        // - This pointer was obtained from Box::into_raw, so it is valid to
        //   convert it into a reference.
        // - Installed registries are never torn down, so the pointer remains
        //   valid for the lifetime of the process.
        Some(unsafe { ptr.as_ref() })
    }
}

/// Error returned when attempting to install a registry when one is already
/// installed.
///
/// Contains the registry that was attempted to be installed, allowing you to
/// recover it if needed.
pub struct RegistryAlreadyInstalledError(pub Registry);

impl fmt::Debug for RegistryAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryAlreadyInstalledError").finish()
    }
}

impl fmt::Display for RegistryAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a registry is already installed globally")
    }
}

impl core::error::Error for RegistryAlreadyInstalledError {}

struct GlobalRegistry {
    /// # Safety
    ///
    /// 1. This pointer is either null or points to a valid `Registry` that
    ///    has been created using `Box::into_raw`.
    /// 2. Once set, the pointer remains valid for the lifetime of the
    ///    process; installed registries are never reclaimed.
    /// 3. All writes to the `AtomicPtr` use release semantics, and all reads
    ///    that will dereference the pointer use acquire semantics.
    ptr: AtomicPtr<Registry>,
}

impl GlobalRegistry {
    const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Fetches the currently installed registry, if any.
    fn fetch(&self) -> Option<NonNull<Registry>> {
        let ptr = self.ptr.load(Ordering::Acquire);
        NonNull::new(ptr)
    }

    /// Installs a new registry, erroring if one is already installed.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The `new` pointer is valid and points to a `Box<Registry>` that has
    ///    been turned into a raw pointer using `Box::into_raw`.
    /// 2. On success the function claims ownership of the `new` pointer, and
    ///    it cannot be used by the caller anymore.
    /// 3. On failure, the `new` pointer remains owned by the caller and it is
    ///    their responsibility to manage its memory.
    unsafe fn install(&self, new: *mut Registry) -> Result<(), ()> {
        match self.ptr.compare_exchange(
            core::ptr::null_mut(),
            new,
            Ordering::Release,
            Ordering::Relaxed,
        ) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }
}

static GLOBAL: GlobalRegistry = GlobalRegistry::new();

/// The builtin fallback consulted when no registry has been installed.
static DEFAULT: Registry = Registry::new();

fn active() -> &'static Registry {
    Registry::installed().unwrap_or(&DEFAULT)
}

/// Finds a renderer applicable to `value`, consulting the installed registry
/// or the builtin default.
///
/// This is the entry point a host adapter forwards the debugger's formatter
/// queries to.
pub fn find_renderer<V: HostValue>(value: &V) -> Option<WrapperRenderer> {
    active().find_renderer(value)
}

/// Finds a worker for a (type, method name) pair, consulting the installed
/// registry or the builtin default.
///
/// This is the entry point a host adapter forwards the debugger's
/// synthetic-method queries to.
pub fn find_worker(type_name: &str, method_name: &str) -> Option<AccessorWorker> {
    active().find_worker(type_name, method_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_send_and_sync() {
        static_assertions::assert_impl_all!(Registry: Send, Sync);
    }

    #[test]
    fn match_verdicts_are_stable_across_repeat_queries() {
        let registry = Registry::new();
        let name = "isocpp_p0201::polymorphic<Wrapper<Base>>";

        let first = registry.match_type(name).unwrap();
        // Second query is served from the cache.
        let second = registry.match_type(name).unwrap();
        assert_eq!(first, second);

        assert_eq!(registry.match_type("std::vector<int>"), None);
        assert_eq!(registry.match_type("std::vector<int>"), None);
    }
}
