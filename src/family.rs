//! Static description of the wrapper type family.
//!
//! The two supported sibling types are structurally identical: a class
//! template with a single owned-pointer data member. Rather than duplicating
//! a matcher, renderer and accessor per sibling, each one is a row in a
//! table of [`WrapperFamily`] entries that the registry iterates at query
//! time. Additional structurally identical wrappers can be registered with
//! [`Registry::family`](crate::registry::Registry::family).

use core::fmt;

/// Identifies which member of the wrapper family a recognized type belongs
/// to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FamilyTag {
    /// `isocpp_p0201::polymorphic<T>`, the copying wrapper.
    Polymorphic,
    /// `isocpp_p0201::polymorphic_value<T>`, the value wrapper.
    PolymorphicValue,
}

impl fmt::Display for FamilyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyTag::Polymorphic => f.write_str("polymorphic"),
            FamilyTag::PolymorphicValue => f.write_str("polymorphic_value"),
        }
    }
}

/// One recognizable member of the wrapper family.
///
/// A family is matched purely by name structure:
/// `<namespace>::<name><parameter-list>`. The `handle_field` names the
/// wrapper's sole non-empty data member, the owned pointer that the renderer
/// and the synthesized accessors read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WrapperFamily {
    /// Tag reported on descriptors produced for this family.
    pub tag: FamilyTag,
    /// Enclosing namespace of the wrapper template, without trailing `::`.
    pub namespace: &'static str,
    /// Unqualified template name.
    pub name: &'static str,
    /// Name of the owned-pointer field inside a wrapper instance.
    pub handle_field: &'static str,
}

/// The builtin registration table.
///
/// Matching is attempted in table order, first match wins. The order here is
/// immaterial for the builtin entries: `polymorphic` only matches when the
/// character after the name is `<`, so it cannot shadow `polymorphic_value`.
pub const WRAPPER_FAMILIES: &[WrapperFamily] = &[
    WrapperFamily {
        tag: FamilyTag::Polymorphic,
        namespace: "isocpp_p0201",
        name: "polymorphic",
        handle_field: "ptr_",
    },
    WrapperFamily {
        tag: FamilyTag::PolymorphicValue,
        namespace: "isocpp_p0201",
        name: "polymorphic_value",
        handle_field: "ptr_",
    },
];
