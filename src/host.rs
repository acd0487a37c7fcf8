//! The capability surface this plugin requires from a hosting debugger.
//!
//! The plugin has no object hierarchy of its own: it is data plus pure
//! functions over a host-provided view of debuggee memory. Everything it
//! needs from the debugger's scripting API is captured by the [`HostValue`]
//! trait, so any debugger offering an equivalent extension surface can host
//! the plugin. Tests implement the trait with a scripted in-memory fake.

use alloc::{borrow::Cow, string::String};

/// A live or snapshotted debuggee value, as exposed by the host debugger's
/// value-inspection API.
///
/// Implementations are read-only views: none of these methods may mutate
/// the inspected process. All of them operate on already-materialized
/// memory of a paused process, so they are expected to complete without
/// suspension.
///
/// Dynamic type resolution is deliberately a method rather than a cached
/// attribute. The debuggee state can change between inspections, so the
/// plugin re-queries it on every render and never stores the result.
pub trait HostValue: Sized {
    /// Fully-qualified declared (static) type name of this value.
    ///
    /// This is the string the matcher tests against the wrapper family
    /// pattern.
    fn type_name(&self) -> Cow<'_, str>;

    /// Reads a named data member of this value.
    ///
    /// Returns `None` when the value has no such member, which the plugin
    /// treats as "this does not look like a wrapper after all" rather than
    /// as an error.
    fn member(&self, name: &str) -> Option<Self>;

    /// Whether this value is a pointer holding a null address.
    fn is_null(&self) -> bool;

    /// Resolves the runtime type name of this value.
    ///
    /// For a value reached through a polymorphic pointer this is the most
    /// derived type, which may differ from [`type_name`](Self::type_name).
    fn dynamic_type_name(&self) -> String;

    /// Follows this pointer value to its pointee.
    ///
    /// Returns `None` when the target memory cannot be read, for instance
    /// because the pointer is dangling in a core dump.
    fn dereference(&self) -> Option<Self>;

    /// Formats this value using the host's own default rules.
    ///
    /// The renderer delegates the pointee representation here instead of
    /// reimplementing host formatting, so user-installed formatters for the
    /// pointee type keep working.
    fn render_default(&self) -> String;
}
