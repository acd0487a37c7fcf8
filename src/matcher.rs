//! Structural recognition of wrapper type names.
//!
//! Recognition is **name-based, not type-identity-based**. Debuggers surface
//! many textually equivalent instantiations of the same template from
//! different translation units, and those are not guaranteed to share a
//! single symbol-table entity. Comparing fully-qualified name strings is the
//! only applicability test that holds across all of them.
//!
//! The parameter list is extracted with an explicit bracket-depth parse
//! instead of a regular expression, so nested template parameters such as
//! `Wrapper<Base>` survive intact rather than being truncated at the first
//! `>`. A name whose parameter list cannot be parsed (unbalanced nesting,
//! empty list) is treated as not applicable, never as an error: matching is
//! attempted against every type the host ever displays, and a malformed
//! stranger must not destabilize unrelated debugger operations.

use alloc::string::{String, ToString};

use crate::family::{FamilyTag, WrapperFamily};

/// A recognized instantiation of the wrapper family.
///
/// Produced by [`match_family`] when a fully-qualified type name matches the
/// expected structural pattern. Immutable once created; the registry may
/// memoize descriptors by raw type name since matching is pure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperTypeDescriptor {
    tag: FamilyTag,
    raw_name: String,
    param: String,
    handle_field: &'static str,
}

impl WrapperTypeDescriptor {
    /// Which family member this descriptor belongs to.
    pub fn tag(&self) -> FamilyTag {
        self.tag
    }

    /// The full type name the descriptor was matched from.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// The extracted template parameter list.
    ///
    /// This is the static "interface" type the wrapper is declared over, as
    /// opposed to the dynamic type of the currently-owned object.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Name of the owned-pointer field inside instances of this type.
    pub fn handle_field(&self) -> &'static str {
        self.handle_field
    }
}

/// Tests a fully-qualified type name against a single family.
///
/// Returns a descriptor when `type_name` spells
/// `<namespace>::<name><parameter-list>` with a balanced, non-empty
/// parameter list whose closing `>` ends the name. Anything else, including
/// qualified members such as `polymorphic<T>::iterator`, yields `None`.
pub fn match_family(family: &WrapperFamily, type_name: &str) -> Option<WrapperTypeDescriptor> {
    let trimmed = type_name.trim();
    let rest = trimmed.strip_prefix(family.namespace)?;
    let rest = rest.strip_prefix("::")?;
    let rest = rest.strip_prefix(family.name)?;
    let rest = rest.strip_prefix('<')?;

    let param = parse_parameter_list(rest)?;
    if param.is_empty() {
        return None;
    }

    Some(WrapperTypeDescriptor {
        tag: family.tag,
        raw_name: trimmed.to_string(),
        param: param.to_string(),
        handle_field: family.handle_field,
    })
}

/// Tests a type name against each family in table order, first match wins.
pub fn match_any(
    families: &[WrapperFamily],
    type_name: &str,
) -> Option<WrapperTypeDescriptor> {
    families
        .iter()
        .find_map(|family| match_family(family, type_name))
}

/// Extracts the parameter list from `rest`, the text just past the opening
/// `<` of the template argument list.
///
/// Counts `<`/`>` nesting depth; the bracket closing the list must be the
/// final character of the name. Whitespace around the parameter is stripped,
/// tolerating the `Wrapper<Base> >` spelling some debuggers emit.
fn parse_parameter_list(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    if idx + ch.len_utf8() == rest.len() {
                        return Some(rest[..idx].trim());
                    }
                    // Trailing text past the closing bracket means this is a
                    // nested entity of the wrapper, not the wrapper itself.
                    return None;
                }
            }
            _ => {}
        }
    }
    // Unbalanced parameter list. Malformed names are declined, not errors.
    None
}
