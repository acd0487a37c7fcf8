//! Commonly used items for convenient importing.
//!
//! Re-exports the types a host adapter touches when wiring the plugin into a
//! debugger, plus the module-level query entry points.
//!
//! # Usage
//!
//! ```
//! use polyprobe::prelude::*;
//!
//! let worker = Registry::new()
//!     .find_worker("isocpp_p0201::polymorphic_value<Shape>", "operator->")
//!     .unwrap();
//! assert_eq!(worker.result_type_name(), "Shape *");
//! ```

pub use crate::{
    family::{FamilyTag, WRAPPER_FAMILIES, WrapperFamily},
    host::HostValue,
    matcher::WrapperTypeDescriptor,
    registry::{Registry, RegistryAlreadyInstalledError, find_renderer, find_worker},
    render::WrapperRenderer,
    worker::{AccessError, AccessorWorker, Operation},
};
