//! Constructors available in every compilation, unless the prelude is disabled

use ctfe::builder::*;
use ctfe::Body;
use typeval::Ty;

use crate::{EQ, TOTALORD};

pub struct Builtin {
    pub name: &'static str,
    pub params: Vec<&'static str>,
    pub body: Body,
    /// Traits implemented by the produced type. Only meaningful for constructors without
    /// parameters, which produce a single type.
    pub implements: &'static [&'static str],
}

fn u8() -> Ty {
    Ty::integer(typeval::IntegerWidth::Eight, false)
}

fn u64() -> Ty {
    Ty::integer(typeval::IntegerWidth::SixtyFour, false)
}

// fun string() -> type {
//     mut kind = struct { data: *u8, len: u64 };
//     kind
// }
fn string() -> Builtin {
    Builtin {
        name: "string",
        params: vec![],
        body: body(
            vec![mutable(
                "kind",
                structure(vec![("data", pointer(ty(u8()))), ("len", ty(u64()))]),
            )],
            var("kind"),
        ),
        implements: &[TOTALORD, EQ],
    }
}

// fun hashmap(key: type, value: type) -> type {
//     assert(has_impl(totalord, key));
//
//     let storage = { bool: [2]value }.get(key).or_else(*value);
//     mut kind = struct { keys: *key, values: storage, len: u64 };
//
//     kind.new = fun new() -> kind;
//     kind.insert = fun insert(*kind, key, value) -> unit;
//     kind.get = fun get(*kind, key) -> *value;
//
//     kind
// }
fn hashmap() -> Builtin {
    Builtin {
        name: "hashmap",
        params: vec!["key", "value"],
        body: body(
            vec![
                assert(has_impl(TOTALORD, var("key"))),
                binding(
                    "storage",
                    map_get(
                        map(vec![(ty(Ty::bool()), array(var("value"), int(2)))]),
                        var("key"),
                        pointer(var("value")),
                    ),
                ),
                mutable(
                    "kind",
                    structure(vec![
                        ("keys", pointer(var("key"))),
                        ("values", var("storage")),
                        ("len", ty(u64())),
                    ]),
                ),
                assign_member("kind", "new", function("new", vec![], var("kind"), 0)),
                assign_member(
                    "kind",
                    "insert",
                    function(
                        "insert",
                        vec![pointer(var("kind")), var("key"), var("value")],
                        ty(Ty::unit()),
                        1,
                    ),
                ),
                assign_member(
                    "kind",
                    "get",
                    function(
                        "get",
                        vec![pointer(var("kind")), var("key")],
                        pointer(var("value")),
                        2,
                    ),
                ),
            ],
            var("kind"),
        ),
        implements: &[],
    }
}

// fun pair(a: type, b: type) -> type {
//     mut kind = struct { first: a, second: b };
//     kind.new = fun new(a, b) -> kind;
//     kind
// }
fn pair() -> Builtin {
    Builtin {
        name: "pair",
        params: vec!["a", "b"],
        body: body(
            vec![
                mutable(
                    "kind",
                    structure(vec![("first", var("a")), ("second", var("b"))]),
                ),
                assign_member(
                    "kind",
                    "new",
                    function("new", vec![var("a"), var("b")], var("kind"), 3),
                ),
            ],
            var("kind"),
        ),
        implements: &[],
    }
}

// fun option(elem: type) -> type {
//     mut kind = enum { none: unit, some: elem };
//     kind
// }
fn option() -> Builtin {
    Builtin {
        name: "option",
        params: vec!["elem"],
        body: body(
            vec![mutable(
                "kind",
                enumeration(vec![("none", ty(Ty::unit())), ("some", var("elem"))]),
            )],
            var("kind"),
        ),
        implements: &[],
    }
}

// fun list(elem: type) -> type {
//     mut kind = enum { nil: unit, cons: (elem, *Self) };
//     kind.head = fun head(*kind) -> option(elem);
//     kind
// }
fn list() -> Builtin {
    Builtin {
        name: "list",
        params: vec!["elem"],
        body: body(
            vec![
                mutable(
                    "kind",
                    enumeration(vec![
                        ("nil", ty(Ty::unit())),
                        ("cons", tuple_type(vec![var("elem"), pointer(self_type())])),
                    ]),
                ),
                assign_member(
                    "kind",
                    "head",
                    function(
                        "head",
                        vec![pointer(var("kind"))],
                        call("option", vec![var("elem")]),
                        4,
                    ),
                ),
            ],
            var("kind"),
        ),
        implements: &[],
    }
}

/// All prelude constructors, in declaration order
pub fn prelude() -> Vec<Builtin> {
    vec![string(), option(), hashmap(), pair(), list()]
}

#[cfg(test)]
mod tests {
    use super::*;

    use capability::CapabilityRegistry;
    use ctfe::{Constructor, Evaluator, Instantiate};
    use error::{ErrKind, Error};
    use location::SpanTuple;
    use symbol::Symbol;
    use typeval::{Args, CtorId, IntegerWidth, Nominal, Value};

    struct NoNesting;

    impl Instantiate for NoNesting {
        fn instantiate(&mut self, _: CtorId, _: Args, _: &SpanTuple) -> Result<Ty, Error> {
            Err(Error::new(ErrKind::UnknownName))
        }

        fn lookup(&self, _: Symbol) -> Option<CtorId> {
            None
        }
    }

    fn evaluate(builtin: Builtin, args: Vec<Ty>) -> Result<Ty, Error> {
        let mut registry = CapabilityRegistry::new();
        crate::intrinsics(&mut registry)?;

        let id = CtorId::new(0, Symbol::from(builtin.name));
        let ctor = Constructor {
            id,
            params: builtin.params.iter().map(|p| Symbol::from(*p)).collect(),
            body: builtin.body,
            location: SpanTuple::builtin(),
        };
        let args = args.into_iter().map(Value::Type).collect::<Args>();

        Evaluator::new(&registry, &mut NoNesting, Nominal::new(id, args)).evaluate(&ctor)
    }

    #[test]
    fn unique_names() {
        let mut names = prelude().into_iter().map(|b| b.name).collect::<Vec<_>>();
        let count = names.len();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), count);
    }

    #[test]
    fn only_singletons_implement_traits() {
        prelude()
            .iter()
            .filter(|b| !b.implements.is_empty())
            .for_each(|b| assert!(b.params.is_empty()));
    }

    #[test]
    fn hashmap_storage() {
        let i32 = Ty::integer(IntegerWidth::ThirtyTwo, true);

        let by_bool = evaluate(hashmap(), vec![Ty::bool(), i32.clone()]).unwrap();
        let by_int = evaluate(hashmap(), vec![i32.clone(), i32.clone()]).unwrap();

        assert_eq!(
            by_bool.member(Symbol::from("values")),
            Some(&Ty::array(i32.clone(), 2))
        );
        assert_eq!(
            by_int.member(Symbol::from("values")),
            Some(&Ty::pointer(i32))
        );
        assert_eq!(by_int.methods().map(|m| m.len()), Some(3));
    }

    #[test]
    fn hashmap_needs_ordered_keys() {
        let err = evaluate(hashmap(), vec![Ty::float(false), Ty::bool()]).unwrap_err();

        assert_eq!(err.kind(), &ErrKind::AssertionFailed);
    }

    #[test]
    fn pair_display() {
        let ty = evaluate(pair(), vec![Ty::bool(), Ty::unit()]).unwrap();

        assert_eq!(ty.to_string(), "pair(bool, unit)");
        assert_eq!(
            format!("{ty:#}"),
            "pair(bool, unit) = struct { first: bool, second: unit; new = fun new(bool, unit) -> pair(bool, unit) }"
        );
    }
}
