#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Debugger introspection plugin for boxed polymorphic value wrappers.
//!
//! ## Overview
//!
//! A boxed polymorphic value type such as `isocpp_p0201::polymorphic<T>` or
//! `isocpp_p0201::polymorphic_value<T>` is a handle owning a heap-allocated
//! object of some runtime-determined subtype. Without help, a debugger shows
//! only the wrapper's raw internal pointer: an opaque address with no type or
//! value information useful to a human inspecting a live or post-mortem
//! process.
//!
//! This crate is the decision-making core of a debugger plugin that fixes
//! that. It:
//!
//! - recognizes wrapper instantiations by **structural name pattern** rather
//!   than nominal type identity, since debuggers surface many textually
//!   equivalent instantiations from different translation units
//!   ([`matcher`]),
//! - renders a wrapper as `(<dynamic type>) <value>`, resolving the runtime
//!   subtype of the currently-owned object at every inspection ([`render`]),
//! - synthesizes the `operator*` and `operator->` accessors the expression
//!   evaluator needs to make `*wrapper` and `wrapper->field` work even when
//!   the inspected binary carries no debug symbols for those operators
//!   ([`worker`]),
//! - exposes all of the above through a process-wide, install-once
//!   [`Registry`](registry::Registry) the host debugger consults for every
//!   value it displays ([`registry`]).
//!
//! The plugin never owns debuggee state and never mutates it. Every query is
//! a pure read over an already-paused process snapshot, and every lookup is
//! total: a type the plugin does not recognize yields `None`, never a panic,
//! so the host can safely ask about anything.
//!
//! ## Hosting
//!
//! The crate is polymorphic over the hosting debugger. A host adapter
//! implements [`HostValue`](host::HostValue) for its value-inspection handle
//! and forwards formatter and synthetic-method queries to
//! [`registry::find_renderer`] and [`registry::find_worker`]. Any debugger
//! whose scripting API can read a named field, resolve a dynamic type, and
//! format a value with its default rules can host the plugin.
//!
//! ## Quick Example
//!
//! Matching and accessor synthesis work on plain type names, so they can be
//! exercised without a live debugger:
//!
//! ```
//! use polyprobe::prelude::*;
//!
//! let registry = Registry::new();
//!
//! // Nested template parameters are extracted in full.
//! let descriptor = registry
//!     .match_type("isocpp_p0201::polymorphic<Wrapper<Base>>")
//!     .unwrap();
//! assert_eq!(descriptor.param(), "Wrapper<Base>");
//!
//! // `*wrapper` evaluates to the declared interface type.
//! let worker = registry
//!     .find_worker("isocpp_p0201::polymorphic<Base>", "operator*")
//!     .unwrap();
//! assert_eq!(worker.result_type_name(), "Base");
//!
//! // Unrelated types are declined, not errored on.
//! assert!(registry.match_type("std::vector<int>").is_none());
//! ```
//!
//! ## The wrapper family
//!
//! The two supported sibling types share one structure: a single owned
//! pointer field. They are described by a static table of
//! [`WrapperFamily`](family::WrapperFamily) entries rather than duplicated
//! code paths, and the table can be extended at registration time for
//! structurally identical wrappers living under other names.

extern crate alloc;

pub mod family;
pub mod host;
pub mod matcher;
pub mod prelude;
pub mod registry;
pub mod render;
pub mod worker;

pub use self::{
    family::{FamilyTag, WrapperFamily},
    host::HostValue,
    matcher::WrapperTypeDescriptor,
    registry::{Registry, RegistryAlreadyInstalledError},
    render::WrapperRenderer,
    worker::{AccessError, AccessorWorker, Operation},
};
