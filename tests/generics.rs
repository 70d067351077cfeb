use std::thread;

use location::{Location, SourceOwned};
use tycon::builder::*;
use tycon::{Args, Body, Compilation, Config, CtorId, ErrKind, SharedCompilation, SpanTuple, Symbol, Ty, Value};

fn compilation() -> Compilation {
    Compilation::new().unwrap()
}

fn declare(compilation: &mut Compilation, name: &str, params: &[&str], body: Body) -> CtorId {
    compilation.declare(
        Symbol::from(name),
        params.iter().map(|p| Symbol::from(*p)).collect(),
        body,
        SpanTuple::builtin(),
    )
}

fn resolve(compilation: &mut Compilation, name: &str) -> Ty {
    compilation.resolve(name).unwrap()
}

// mut kind = struct { x: i32 }; kind
fn one_field(compilation: &mut Compilation) -> Body {
    body(
        vec![mutable("kind", structure(vec![("x", ty(resolve(compilation, "i32")))]))],
        var("kind"),
    )
}

#[test]
fn identity_stability() {
    let mut compilation = compilation();

    let args = vec![resolve(&mut compilation, "i32"), resolve(&mut compilation, "string")];
    let first = compilation.instantiate("hashmap", args).unwrap();

    // same arguments, built from scratch
    let args = vec![resolve(&mut compilation, "i32"), resolve(&mut compilation, "string")];
    let second = compilation.instantiate("hashmap", args).unwrap();

    assert!(first.is(&second));
    assert_eq!(first.to_string(), "hashmap(i32, string)");
}

#[test]
fn at_most_once_evaluation() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");

    compilation.instantiate("pair", vec![i32.clone(), i32.clone()]).unwrap();
    let instantiated = compilation.cache().len();
    compilation.instantiate("pair", vec![i32.clone(), i32]).unwrap();

    assert_eq!(compilation.cache().len(), instantiated);
}

#[test]
fn failures_are_not_memoized() {
    let mut compilation = compilation();
    let f32 = resolve(&mut compilation, "f32");
    let i32 = resolve(&mut compilation, "i32");

    let err = compilation
        .instantiate("hashmap", vec![f32.clone(), i32.clone()])
        .unwrap_err();
    assert_eq!(err.kind(), &ErrKind::AssertionFailed);

    compilation
        .registry_mut()
        .record(Symbol::from("totalord"), f32.clone());

    // the constructor runs again, and now sees the new fact
    let map = compilation.instantiate("hashmap", vec![f32, i32]).unwrap();
    assert_eq!(map.to_string(), "hashmap(f32, i32)");
}

#[test]
fn argument_discrimination() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");
    let boolean = resolve(&mut compilation, "bool");

    let lhs = compilation.instantiate("option", vec![i32]).unwrap();
    let rhs = compilation.instantiate("option", vec![boolean]).unwrap();

    assert!(!lhs.is(&rhs));
    assert_ne!(lhs, rhs);
}

#[test]
fn constructor_discrimination() {
    let mut compilation = compilation();

    let body = one_field(&mut compilation);
    let a = declare(&mut compilation, "a", &[], body.clone());
    let b = declare(&mut compilation, "b", &[], body);

    let a = compilation.call(a, Args::empty()).unwrap();
    let b = compilation.call(b, Args::empty()).unwrap();

    assert!(!a.is(&b));
    assert_ne!(a, b);
    assert_eq!(a.members(), b.members());
}

#[test]
fn shadowed_constructors_fail_distinctly() {
    let mut compilation = compilation();

    let checked = || body(vec![assert(has_impl("eq", var("elem")))], var("elem"));
    let first = declare(&mut compilation, "checked", &["elem"], checked());
    let second = declare(&mut compilation, "checked", &["elem"], checked());

    let f32 = resolve(&mut compilation, "f32");
    let from_first = compilation
        .call(first, Args::from(vec![Value::Type(f32.clone())]))
        .unwrap_err();
    let from_second = compilation.instantiate("checked", vec![f32]).unwrap_err();

    assert_eq!(
        from_first.instantiation().map(|inst| inst.origin),
        Some(first.origin())
    );
    assert_eq!(
        from_second.instantiation().map(|inst| inst.origin),
        Some(second.origin())
    );
    assert_ne!(from_first.to_string(), from_second.to_string());
}

#[test]
fn shadowed_constructors_stay_distinct() {
    let mut compilation = compilation();

    let body = one_field(&mut compilation);
    let first = declare(&mut compilation, "thing", &[], body.clone());
    let first = compilation.call(first, Args::empty()).unwrap();

    declare(&mut compilation, "thing", &[], body);
    let second = compilation.instantiate("thing", vec![]).unwrap();

    assert!(!first.is(&second));
}

#[test]
fn capability_gating() {
    let mut compilation = compilation();
    let f64 = resolve(&mut compilation, "f64");
    let i32 = resolve(&mut compilation, "i32");

    let err = compilation.instantiate("hashmap", vec![f64, i32]).unwrap_err();

    assert_eq!(err.kind(), &ErrKind::AssertionFailed);
    assert_eq!(
        err.to_string(),
        "assertion failed: `f64` does not implement `totalord` (while instantiating `hashmap(f64, i32)`, constructor #2) at <builtin>:1:1"
    );
}

#[test]
fn methods_attached_before_freezing() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");
    let boolean = resolve(&mut compilation, "bool");

    let map = compilation.instantiate("hashmap", vec![i32, boolean]).unwrap();
    let new = map.method(Symbol::from("new")).unwrap();

    assert_eq!(new.ret.nominal(), map.nominal());
    assert_eq!(
        new.signature().to_string(),
        "fun() -> hashmap(i32, bool)"
    );
}

#[test]
fn frozen_after_cache() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");

    // mut t = hashmap(i32, i32); t.clear = fun clear(*t) -> unit; t
    let extend = body(
        vec![
            mutable("t", call("hashmap", vec![ty(i32.clone()), ty(i32.clone())])),
            assign_member(
                "t",
                "clear",
                function("clear", vec![pointer(var("t"))], ty(resolve(&mut compilation, "unit")), 7),
            ),
        ],
        var("t"),
    );
    declare(&mut compilation, "extend", &[], extend);

    let err = compilation.instantiate("extend", vec![]).unwrap_err();
    assert_eq!(err.kind(), &ErrKind::FrozenType);

    let map = compilation.instantiate("hashmap", vec![i32.clone(), i32]).unwrap();
    assert!(map.method(Symbol::from("clear")).is_none());
}

// mut kind = struct { items: *elem };
// kind.new = fun new() -> kind;
// mut plain = struct { items: [4]elem };
// if has_impl(totalord, elem) { kind } else { plain }
fn storage() -> Body {
    body(
        vec![
            mutable("kind", structure(vec![("items", pointer(var("elem")))])),
            assign_member("kind", "new", function("new", vec![], var("kind"), 8)),
            mutable("plain", structure(vec![("items", array(var("elem"), int(4)))])),
        ],
        if_else(
            has_impl("totalord", var("elem")),
            var("kind"),
            var("plain"),
        ),
    )
}

#[test]
fn conditional_result_is_cached_with_its_methods() {
    let mut compilation = compilation();
    declare(&mut compilation, "storage", &["elem"], storage());

    let i32 = resolve(&mut compilation, "i32");
    let sorted = compilation.instantiate("storage", vec![i32.clone()]).unwrap();

    assert_eq!(sorted.to_string(), "storage(i32)");
    assert_eq!(
        format!("{sorted:#}"),
        "storage(i32) = struct { items: *i32; new = fun new() -> storage(i32) }"
    );
    let new = sorted.method(Symbol::from("new")).unwrap();
    assert_eq!(new.ret.nominal(), sorted.nominal());

    let again = compilation.instantiate("storage", vec![i32]).unwrap();
    assert!(again.is(&sorted));

    let f32 = resolve(&mut compilation, "f32");
    let plain = compilation.instantiate("storage", vec![f32]).unwrap();

    assert_eq!(
        format!("{plain:#}"),
        "storage(f32) = struct { items: [4]f32 }"
    );
}

#[test]
fn working_values_nest() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");

    // mut inner = struct { a: i32 }; mut outer = struct { child: inner }; outer
    let nest = body(
        vec![
            mutable("inner", structure(vec![("a", ty(i32.clone()))])),
            mutable("outer", structure(vec![("child", var("inner"))])),
        ],
        var("outer"),
    );
    declare(&mut compilation, "nest", &[], nest);

    let outer = compilation.instantiate("nest", vec![]).unwrap();
    let child = outer.member(Symbol::from("child")).unwrap();

    assert_eq!(outer.to_string(), "nest");
    assert_eq!(child.to_string(), "struct { a: i32 }");
    assert_eq!(child.member(Symbol::from("a")), Some(&i32));
}

#[test]
fn cycle_detection() {
    let mut compilation = compilation();

    // mut kind = struct { inner: endless(t) }; kind
    let endless = body(
        vec![mutable(
            "kind",
            structure(vec![("inner", call("endless", vec![var("t")]))]),
        )],
        var("kind"),
    );
    let id = declare(&mut compilation, "endless", &["t"], endless);

    let i32 = resolve(&mut compilation, "i32");
    let err = compilation.instantiate("endless", vec![i32.clone()]).unwrap_err();

    assert_eq!(err.kind(), &ErrKind::CyclicInstantiation);
    assert_eq!(
        err.instantiation().map(ToString::to_string),
        Some(String::from("endless(i32)"))
    );

    let args = Args::from(vec![Value::Type(i32)]);
    assert!(compilation.cache().get(id, &args).is_none());
    assert!(!compilation.cache().is_in_progress(id, &args));
}

#[test]
fn self_reference_is_not_a_cycle() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");

    let list = compilation.instantiate("list", vec![i32.clone()]).unwrap();
    let cons = list.member(Symbol::from("cons")).unwrap();

    assert_eq!(cons.to_string(), "(i32, *list(i32))");

    let head = list.method(Symbol::from("head")).unwrap();
    let option = compilation.instantiate("option", vec![i32]).unwrap();
    assert!(head.ret.is(&option));
}

#[test]
fn arity() {
    let mut compilation = compilation();
    let i32 = resolve(&mut compilation, "i32");

    let err = compilation.instantiate("hashmap", vec![i32]).unwrap_err();

    assert_eq!(err.kind(), &ErrKind::Arity);
    assert_eq!(err.hints().len(), 1);
}

#[test]
fn errors_are_located() {
    let mut compilation = compilation();

    let loc = SpanTuple::with_source(
        SourceOwned::Input(String::from("assert(has_impl(eq, elem));")),
        Location::new(1, 1),
        Location::new(1, 27),
    );
    let mut check = assert(has_impl("eq", var("elem")));
    check.location = loc.clone();

    declare(&mut compilation, "checked", &["elem"], body(vec![check], var("elem")));

    let f32 = resolve(&mut compilation, "f32");
    let err = compilation.instantiate("checked", vec![f32]).unwrap_err();

    assert_eq!(err.loc(), Some(&loc));
    assert_eq!(err.msg(), Some("`f32` does not implement `eq`"));
}

#[test]
fn unrelated_instantiations_keep_working() {
    let mut compilation = compilation();
    let f32 = resolve(&mut compilation, "f32");
    let u8 = resolve(&mut compilation, "u8");

    assert!(compilation.instantiate("hashmap", vec![f32.clone(), f32]).is_err());
    assert!(compilation.instantiate("hashmap", vec![u8.clone(), u8]).is_ok());
    assert!(compilation.instantiate("nope", vec![]).is_err());
    assert!(compilation.instantiate("string", vec![]).is_ok());
}

#[test]
fn constructors_as_values() {
    let mut compilation = compilation();

    // let impls = { list: *elem }; impls.get(c).or_else(c(elem))
    let via = body(
        vec![binding("impls", map(vec![(var("list"), pointer(var("elem")))]))],
        map_get(
            var("impls"),
            var("c"),
            call_value(var("c"), vec![var("elem")]),
        ),
    );
    let via = declare(&mut compilation, "via", &["c", "elem"], via);

    let i32 = resolve(&mut compilation, "i32");
    let list = compilation.lookup("list").unwrap();
    let option = compilation.lookup("option").unwrap();

    let through_list = compilation
        .call(
            via,
            Args::from(vec![Value::Constructor(list), Value::Type(i32.clone())]),
        )
        .unwrap();
    assert_eq!(through_list.to_string(), "*i32");
    // the default is only evaluated when needed
    assert!(compilation
        .cache()
        .get(list, &Args::from(vec![Value::Type(i32.clone())]))
        .is_none());

    let through_option = compilation
        .call(
            via,
            Args::from(vec![Value::Constructor(option), Value::Type(i32.clone())]),
        )
        .unwrap();
    assert!(through_option.is(&compilation.instantiate("option", vec![i32]).unwrap()));
}

#[test]
fn without_prelude() {
    let mut compilation = Compilation::with_config(Config {
        prelude: false,
        log: false,
    })
    .unwrap();

    assert!(compilation.lookup("hashmap").is_none());
    assert!(compilation.resolve("i32").is_ok());
    assert_eq!(
        compilation.resolve("string").unwrap_err().kind(),
        &ErrKind::UnknownName
    );
    assert!(!compilation.registry().is_declared(Symbol::from("totalord")));
}

#[test]
fn shared_between_threads() {
    let shared = SharedCompilation::new(compilation());

    let handles = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let key = shared.resolve("string").unwrap();
                let value = shared.resolve("u64").unwrap();

                shared.instantiate("hashmap", vec![key, value]).unwrap()
            })
        })
        .collect::<Vec<_>>();

    let maps = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    assert!(maps.windows(2).all(|pair| pair[0].is(&pair[1])));
    assert_eq!(shared.with(|compilation| compilation.cache().len()), 2);
}
