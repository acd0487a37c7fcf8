//! Behavioral tests exercising the plugin against a scripted fake host.
//!
//! The fake implements the full [`HostValue`] capability surface with plain
//! in-memory data, which is enough to drive every renderer and worker path
//! the way a real debugger would: values carry a declared type name, named
//! members, an optional pointee, and a canned default rendering.

use std::borrow::Cow;

use polyprobe::{prelude::*, render};

/// In-memory stand-in for a debugger value handle.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FakeValue {
    type_name: String,
    dynamic_type: String,
    printed: String,
    null: bool,
    members: Vec<(String, FakeValue)>,
    pointee: Option<Box<FakeValue>>,
}

impl FakeValue {
    /// A plain object whose dynamic type equals its static type.
    fn object(type_name: &str, printed: &str) -> Self {
        Self::derived(type_name, type_name, printed)
    }

    /// An object seen through a base-typed view but with a more derived
    /// runtime type.
    fn derived(type_name: &str, dynamic_type: &str, printed: &str) -> Self {
        FakeValue {
            type_name: type_name.to_owned(),
            dynamic_type: dynamic_type.to_owned(),
            printed: printed.to_owned(),
            null: false,
            members: Vec::new(),
            pointee: None,
        }
    }

    /// A non-null pointer to `pointee`.
    fn pointer(type_name: &str, pointee: FakeValue) -> Self {
        FakeValue {
            type_name: type_name.to_owned(),
            dynamic_type: type_name.to_owned(),
            printed: "0x5555deadbeef".to_owned(),
            null: false,
            members: Vec::new(),
            pointee: Some(Box::new(pointee)),
        }
    }

    /// A non-null pointer whose target memory cannot be read.
    fn dangling_pointer(type_name: &str) -> Self {
        FakeValue {
            pointee: None,
            ..Self::pointer(type_name, FakeValue::object("unused", "unused"))
        }
    }

    /// A null pointer.
    fn null_pointer(type_name: &str) -> Self {
        FakeValue {
            type_name: type_name.to_owned(),
            dynamic_type: type_name.to_owned(),
            printed: "0x0".to_owned(),
            null: true,
            members: Vec::new(),
            pointee: None,
        }
    }

    /// A wrapper instance holding `handle` in the given field.
    fn wrapper_with_field(type_name: &str, field: &str, handle: FakeValue) -> Self {
        FakeValue {
            type_name: type_name.to_owned(),
            dynamic_type: type_name.to_owned(),
            printed: "{...}".to_owned(),
            null: false,
            members: vec![(field.to_owned(), handle)],
            pointee: None,
        }
    }

    /// A wrapper instance with the standard `ptr_` handle field.
    fn wrapper(type_name: &str, handle: FakeValue) -> Self {
        Self::wrapper_with_field(type_name, "ptr_", handle)
    }
}

impl HostValue for FakeValue {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.type_name)
    }

    fn member(&self, name: &str) -> Option<Self> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| value.clone())
    }

    fn is_null(&self) -> bool {
        self.null
    }

    fn dynamic_type_name(&self) -> String {
        self.dynamic_type.clone()
    }

    fn dereference(&self) -> Option<Self> {
        self.pointee.as_deref().cloned()
    }

    fn render_default(&self) -> String {
        self.printed.clone()
    }
}

/// Wrapper type names for both builtin family members, declared over `Base`.
const FAMILY_NAMES: [&str; 2] = [
    "isocpp_p0201::polymorphic<Base>",
    "isocpp_p0201::polymorphic_value<Base>",
];

/// A wrapper of the given type whose owned object is a `Derived` printing
/// as `42`.
fn non_empty_wrapper(type_name: &str) -> FakeValue {
    FakeValue::wrapper(
        type_name,
        FakeValue::pointer("Base *", FakeValue::derived("Base", "Derived", "42")),
    )
}

fn empty_wrapper(type_name: &str) -> FakeValue {
    FakeValue::wrapper(type_name, FakeValue::null_pointer("Base *"))
}

#[test]
fn unrelated_values_are_declined_without_executing_anything() {
    let registry = Registry::new();
    for value in [
        FakeValue::object("std::vector<int>", "{1, 2, 3}"),
        FakeValue::object("int", "7"),
        FakeValue::object("isocpp_p0201::polymorphic_map<int>", "{}"),
        FakeValue::object("", ""),
        FakeValue::object("<<<<", "?"),
    ] {
        assert!(registry.find_renderer(&value).is_none(), "{:?}", value.type_name);
        assert!(
            registry
                .find_worker(&value.type_name, "operator*")
                .is_none()
        );
    }
}

#[test]
fn renders_dynamic_type_and_pointee_value() {
    let registry = Registry::new();
    for type_name in FAMILY_NAMES {
        let value = non_empty_wrapper(type_name);
        let renderer = registry.find_renderer(&value).unwrap();
        assert_eq!(renderer.render(&value), "(Derived) 42");
    }
}

#[test]
fn renders_empty_wrapper_without_dereference() {
    let registry = Registry::new();
    for type_name in FAMILY_NAMES {
        let value = empty_wrapper(type_name);
        let renderer = registry.find_renderer(&value).unwrap();
        assert_eq!(renderer.render(&value), render::EMPTY_REPR);
    }
}

#[test]
fn renders_unreadable_pointee_distinctly() {
    let registry = Registry::new();
    let value = FakeValue::wrapper(
        FAMILY_NAMES[0],
        FakeValue::dangling_pointer("Base *"),
    );
    let renderer = registry.find_renderer(&value).unwrap();
    assert_eq!(renderer.render(&value), render::UNREADABLE_REPR);
}

#[test]
fn renderer_falls_back_when_the_handle_field_is_missing() {
    let registry = Registry::new();
    // The name matches, but the layout does not carry a `ptr_` member.
    let value = FakeValue::object(FAMILY_NAMES[0], "{impostor}");
    let renderer = registry.find_renderer(&value).unwrap();
    assert_eq!(renderer.render(&value), "{impostor}");
}

#[test]
fn dereference_worker_agrees_with_host_dereference() {
    let registry = Registry::new();
    for type_name in FAMILY_NAMES {
        let value = non_empty_wrapper(type_name);
        let worker = registry.find_worker(type_name, "operator*").unwrap();

        let via_worker = worker.invoke(&value).unwrap();
        let via_host = value.member("ptr_").unwrap().dereference().unwrap();
        assert_eq!(via_worker, via_host);
        assert_eq!(worker.result_type_name(), "Base");
    }
}

#[test]
fn member_access_worker_returns_the_handle_unchanged() {
    let registry = Registry::new();
    for type_name in FAMILY_NAMES {
        let value = non_empty_wrapper(type_name);
        let worker = registry.find_worker(type_name, "operator->").unwrap();

        let result = worker.invoke(&value).unwrap();
        assert_eq!(result, value.member("ptr_").unwrap());
        assert_eq!(worker.result_type_name(), "Base *");
    }
}

#[test]
fn invoking_either_operation_on_an_empty_wrapper_is_an_error() {
    let registry = Registry::new();
    for type_name in FAMILY_NAMES {
        let value = empty_wrapper(type_name);
        for method in ["operator*", "operator->"] {
            let worker = registry.find_worker(type_name, method).unwrap();
            let error = worker.invoke(&value).unwrap_err();
            assert_eq!(
                error,
                AccessError::EmptyWrapper {
                    type_name: type_name.to_owned(),
                }
            );
        }
    }
}

#[test]
fn dereference_of_an_unreadable_pointee_is_an_error() {
    let registry = Registry::new();
    let value = FakeValue::wrapper(
        FAMILY_NAMES[0],
        FakeValue::dangling_pointer("Base *"),
    );
    let worker = registry.find_worker(FAMILY_NAMES[0], "operator*").unwrap();
    assert_eq!(
        worker.invoke(&value).unwrap_err(),
        AccessError::UnreadablePointee {
            type_name: FAMILY_NAMES[0].to_owned(),
        }
    );
}

#[test]
fn invoking_on_a_layout_mismatch_is_an_error() {
    let registry = Registry::new();
    let value = FakeValue::object(FAMILY_NAMES[0], "{impostor}");
    let worker = registry.find_worker(FAMILY_NAMES[0], "operator->").unwrap();
    assert_eq!(
        worker.invoke(&value).unwrap_err(),
        AccessError::MissingHandle {
            type_name: FAMILY_NAMES[0].to_owned(),
            field: "ptr_",
        }
    );
}

#[test]
fn nested_parameters_resolve_result_types_in_full() {
    let registry = Registry::new();
    let type_name = "isocpp_p0201::polymorphic<Wrapper<Base>>";

    let deref = registry.find_worker(type_name, "operator*").unwrap();
    assert_eq!(deref.result_type_name(), "Wrapper<Base>");

    let arrow = registry.find_worker(type_name, "operator->").unwrap();
    assert_eq!(arrow.result_type_name(), "Wrapper<Base> *");
}

#[test]
fn unknown_method_names_are_declined() {
    let registry = Registry::new();
    for method in ["operator[]", "operator()", "get", ""] {
        assert!(registry.find_worker(FAMILY_NAMES[0], method).is_none());
    }
}

#[test]
fn plain_operation_names_are_accepted() {
    let registry = Registry::new();
    let deref = registry.find_worker(FAMILY_NAMES[0], "dereference").unwrap();
    assert_eq!(deref.operation(), Operation::Dereference);

    let arrow = registry
        .find_worker(FAMILY_NAMES[0], "member-access")
        .unwrap();
    assert_eq!(arrow.operation(), Operation::MemberAccess);
}

#[test]
fn custom_families_behave_like_the_builtins() {
    let registry = Registry::empty().family(WrapperFamily {
        tag: FamilyTag::PolymorphicValue,
        namespace: "mylib",
        name: "box_poly",
        handle_field: "inner_",
    });

    let value = FakeValue::wrapper_with_field(
        "mylib::box_poly<Base>",
        "inner_",
        FakeValue::pointer("Base *", FakeValue::derived("Base", "Derived", "42")),
    );

    let renderer = registry.find_renderer(&value).unwrap();
    assert_eq!(renderer.render(&value), "(Derived) 42");

    let worker = registry
        .find_worker("mylib::box_poly<Base>", "operator*")
        .unwrap();
    assert_eq!(worker.invoke(&value).unwrap().printed, "42");

    // The builtins are not registered in this registry.
    assert!(registry.match_type(FAMILY_NAMES[0]).is_none());
}

#[test]
fn global_installation_happens_exactly_once() {
    // The installed registry carries the builtin table, so concurrent tests
    // going through the module-level entry points see identical behavior
    // whether they run before or after this installation.
    Registry::new().install().unwrap();

    let error = Registry::new().install().unwrap_err();
    // The rejected registry is handed back intact.
    assert!(error.0.match_type(FAMILY_NAMES[0]).is_some());

    let value = non_empty_wrapper(FAMILY_NAMES[1]);
    let renderer = polyprobe::registry::find_renderer(&value).unwrap();
    assert_eq!(renderer.render(&value), "(Derived) 42");

    let worker = polyprobe::registry::find_worker(FAMILY_NAMES[1], "operator*").unwrap();
    assert_eq!(worker.result_type_name(), "Base");
}

#[test]
fn module_level_queries_are_total_over_garbage() {
    for name in ["", "int", "isocpp_p0201::polymorphic<", "💥<💥>", "a<b<c<d"] {
        let value = FakeValue::object(name, "?");
        assert!(polyprobe::registry::find_renderer(&value).is_none());
        assert!(polyprobe::registry::find_worker(name, "operator*").is_none());
    }
}
