//! Synthesized dereference and member-access operations.
//!
//! The host's expression evaluator has no built-in knowledge that a wrapper
//! "acts like" a pointer, and the wrapper's real `operator*`/`operator->`
//! are frequently inlined away or stripped by the optimizer. The workers in
//! this module are what make `*wrapper` and `wrapper->field` evaluate
//! correctly during live inspection: the evaluator invokes them as if they
//! were compiled methods, and they mirror the operators' semantics by
//! reading the owned-pointer field directly.

use alloc::{
    format,
    string::{String, ToString},
};
use core::fmt;

use crate::{host::HostValue, matcher::WrapperTypeDescriptor};

/// The two synthetic operations the plugin knows how to provide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `*wrapper`: yields the pointee, typed as the declared interface type.
    Dereference,
    /// `wrapper->`: yields the raw owned pointer, so the host's native
    /// pointer machinery handles the subsequent member lookup.
    MemberAccess,
}

impl Operation {
    /// Maps a requested method name to an operation.
    ///
    /// Accepts both the C++ operator spellings the expression evaluator
    /// uses and the plain operation names. Any other name means the plugin
    /// has nothing to offer for this call, returned as `None` rather than
    /// an error.
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name {
            "operator*" | "dereference" => Some(Self::Dereference),
            "operator->" | "member-access" => Some(Self::MemberAccess),
            _ => None,
        }
    }

    /// The C++ spelling of this operation.
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Dereference => "operator*",
            Self::MemberAccess => "operator->",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Error raised when a synthesized accessor is invoked on an instance it
/// cannot safely read.
///
/// Matching and lookup failures are silent (`None`); only invocation-time
/// failures on a confirmed-applicable instance surface to the evaluator,
/// and only as a descriptive message. Dereferencing an invalid address
/// inside the debugger process is never an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The wrapper's handle is null; there is nothing to access.
    EmptyWrapper {
        /// Static type name of the wrapper the access was attempted on.
        type_name: String,
    },
    /// The wrapper does not contain the expected handle field.
    MissingHandle {
        /// Static type name of the wrapper the access was attempted on.
        type_name: String,
        /// The field the plugin expected to find.
        field: &'static str,
    },
    /// The handle holds an address the host cannot read.
    UnreadablePointee {
        /// Static type name of the wrapper the access was attempted on.
        type_name: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::EmptyWrapper { type_name } => {
                write!(f, "cannot access an empty `{type_name}`")
            }
            AccessError::MissingHandle { type_name, field } => {
                write!(f, "`{type_name}` has no `{field}` field")
            }
            AccessError::UnreadablePointee { type_name } => {
                write!(f, "the object owned by this `{type_name}` is not readable")
            }
        }
    }
}

impl core::error::Error for AccessError {}

/// A callable the expression evaluator can apply to a live wrapper
/// instance.
///
/// Bound to a (type, operation) pair by
/// [`Registry::find_worker`](crate::registry::Registry::find_worker).
/// Result-type resolution is pure given the static type, so workers are
/// cheap to create per query and safe to cache keyed by that pair.
#[derive(Clone, Debug)]
pub struct AccessorWorker {
    descriptor: WrapperTypeDescriptor,
    operation: Operation,
}

impl AccessorWorker {
    pub(crate) fn new(descriptor: WrapperTypeDescriptor, operation: Operation) -> Self {
        Self {
            descriptor,
            operation,
        }
    }

    /// The operation this worker implements.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The descriptor this worker was created for.
    pub fn descriptor(&self) -> &WrapperTypeDescriptor {
        &self.descriptor
    }

    /// Name of the type an invocation of this worker evaluates to.
    ///
    /// Dereference yields the declared interface type, the static template
    /// parameter rather than the dynamic type of the owned object. Member
    /// access yields the raw pointer type, handing the next step to the
    /// host's own pointer-member machinery.
    pub fn result_type_name(&self) -> String {
        match self.operation {
            Operation::Dereference => self.descriptor.param().to_string(),
            Operation::MemberAccess => format!("{} *", self.descriptor.param()),
        }
    }

    /// Applies the synthesized operation to a live instance.
    ///
    /// Invoking either operation on an instance whose handle is null is an
    /// [`AccessError`], reported to the evaluator instead of reading an
    /// invalid address.
    pub fn invoke<V: HostValue>(&self, value: &V) -> Result<V, AccessError> {
        let handle = value.member(self.descriptor.handle_field()).ok_or_else(|| {
            AccessError::MissingHandle {
                type_name: self.descriptor.raw_name().to_string(),
                field: self.descriptor.handle_field(),
            }
        })?;

        if handle.is_null() {
            return Err(AccessError::EmptyWrapper {
                type_name: self.descriptor.raw_name().to_string(),
            });
        }

        match self.operation {
            Operation::MemberAccess => Ok(handle),
            Operation::Dereference => {
                handle
                    .dereference()
                    .ok_or_else(|| AccessError::UnreadablePointee {
                        type_name: self.descriptor.raw_name().to_string(),
                    })
            }
        }
    }
}
