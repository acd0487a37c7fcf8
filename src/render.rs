//! Display-string synthesis for recognized wrapper instances.

use alloc::{format, string::String};

use crate::{host::HostValue, matcher::WrapperTypeDescriptor};

/// Rendering produced for a wrapper whose handle is null.
pub const EMPTY_REPR: &str = "<empty>";

/// Rendering produced for a non-null handle whose target memory the host
/// cannot read.
pub const UNREADABLE_REPR: &str = "<unreadable>";

/// Formatter for instances of a recognized wrapper type.
///
/// Obtained from [`Registry::find_renderer`] once the matcher has confirmed
/// applicability. Rendering is a pure read of debuggee memory with no side
/// effects, and it never fails: every degenerate instance state maps to a
/// distinct textual representation.
///
/// [`Registry::find_renderer`]: crate::registry::Registry::find_renderer
#[derive(Clone, Debug)]
pub struct WrapperRenderer {
    descriptor: WrapperTypeDescriptor,
}

impl WrapperRenderer {
    pub(crate) fn new(descriptor: WrapperTypeDescriptor) -> Self {
        Self { descriptor }
    }

    /// The descriptor this renderer was created for.
    pub fn descriptor(&self) -> &WrapperTypeDescriptor {
        &self.descriptor
    }

    /// Produces the display string for a wrapper instance.
    ///
    /// A non-empty instance renders as `(<dynamic type>) <value>`, where the
    /// dynamic type is the runtime subtype of the currently-owned object and
    /// the value part is the host's default rendering of the pointee. An
    /// empty instance renders as [`EMPTY_REPR`] without any dereference
    /// taking place.
    pub fn render<V: HostValue>(&self, value: &V) -> String {
        let Some(handle) = value.member(self.descriptor.handle_field()) else {
            // The name matched but the layout did not. Hand the value back
            // to the host's default formatting instead of guessing.
            return value.render_default();
        };

        if handle.is_null() {
            return String::from(EMPTY_REPR);
        }

        match handle.dereference() {
            Some(pointee) => {
                format!("({}) {}", pointee.dynamic_type_name(), pointee.render_default())
            }
            None => String::from(UNREADABLE_REPR),
        }
    }
}
