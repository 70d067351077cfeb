//! Compile-time values, and the most important of them: types.
//!
//! A type constructor such as `hashmap(key, value)` takes [`Value`]s and produces a
//! [`Ty`]. Types are immutable trees shared through [`Ty`] handles. Two handles can be
//! compared in two ways:
//!
//! - by *value*, using [`PartialEq`]: tags and all substructures are recursively equal,
//! - by *identity*, using [`Ty::is`]: both handles point to the very same type.
//!
//! The instantiation cache guarantees that repeated instantiations are identical, not
//! merely equal. Types produced by a constructor carry a [`Nominal`] tag naming the
//! instantiation they come from, so two constructors building structurally identical
//! structs still produce two different types.
//!
//! Types are finite trees: a type may not contain itself. Recursive types refer to
//! themselves through [`TypeValue::Indirect`], which names an instantiation instead of
//! embedding it, so that equality always terminates.

mod builder;
mod display;
mod value;

pub use builder::{Shape, TypeBuilder};
pub use value::{Args, BodyRef, Function, MapValue, Value};

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use symbol::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntegerWidth {
    Eight,
    Sixteen,
    ThirtyTwo,
    SixtyFour,
}

impl IntegerWidth {
    pub fn bits(&self) -> u8 {
        match self {
            IntegerWidth::Eight => 8,
            IntegerWidth::Sixteen => 16,
            IntegerWidth::ThirtyTwo => 32,
            IntegerWidth::SixtyFour => 64,
        }
    }
}

/// Identity of a declared type constructor. This is allocated once, when the constructor
/// is declared, and never depends on the arguments the constructor is called with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CtorId {
    origin: u64,
    name: Symbol,
}

impl CtorId {
    pub fn new(origin: u64, name: Symbol) -> CtorId {
        CtorId { origin, name }
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    pub fn name(&self) -> Symbol {
        self.name
    }
}

/// Names one instantiation: a constructor and the arguments it was given. This is both
/// the key of the instantiation cache and the tag carried by the types it produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nominal {
    ctor: CtorId,
    args: Args,
}

impl Nominal {
    pub fn new(ctor: CtorId, args: Args) -> Nominal {
        Nominal { ctor, args }
    }

    pub fn ctor(&self) -> CtorId {
        self.ctor
    }

    pub fn args(&self) -> &Args {
        &self.args
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructType {
    pub(crate) nominal: Option<Nominal>,
    pub(crate) fields: Vec<(Symbol, Ty)>,
    pub(crate) methods: BTreeMap<Symbol, Function>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumType {
    pub(crate) nominal: Option<Nominal>,
    pub(crate) variants: Vec<(Symbol, Ty)>,
    pub(crate) methods: BTreeMap<Symbol, Function>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeValue {
    Integer { width: IntegerWidth, signed: bool },
    Bool,
    Float { double: bool },
    Pointer(Ty),
    FunctionPointer { params: Vec<Ty>, ret: Ty },
    Array { element: Ty, len: u64 },
    /// The type of types, `type`
    Type,
    Unit,
    Tuple(Vec<Ty>),
    Struct(StructType),
    Enum(EnumType),
    /// Reference to the type produced by an instantiation, without embedding it
    Indirect(Nominal),
}

/// Shared handle to an immutable [`TypeValue`]. There is no way to mutate the
/// [`TypeValue`] behind a [`Ty`]: types under construction live in a [`TypeBuilder`]
/// until they are finished.
#[derive(Clone)]
pub struct Ty(Arc<TypeValue>);

impl Ty {
    pub fn new(value: TypeValue) -> Ty {
        Ty(Arc::new(value))
    }

    pub fn integer(width: IntegerWidth, signed: bool) -> Ty {
        Ty::new(TypeValue::Integer { width, signed })
    }

    pub fn bool() -> Ty {
        Ty::new(TypeValue::Bool)
    }

    pub fn float(double: bool) -> Ty {
        Ty::new(TypeValue::Float { double })
    }

    pub fn pointer(to: Ty) -> Ty {
        Ty::new(TypeValue::Pointer(to))
    }

    pub fn function_pointer(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::new(TypeValue::FunctionPointer { params, ret })
    }

    pub fn array(element: Ty, len: u64) -> Ty {
        Ty::new(TypeValue::Array { element, len })
    }

    pub fn type_of_types() -> Ty {
        Ty::new(TypeValue::Type)
    }

    pub fn unit() -> Ty {
        Ty::new(TypeValue::Unit)
    }

    pub fn tuple(elements: Vec<Ty>) -> Ty {
        Ty::new(TypeValue::Tuple(elements))
    }

    pub fn indirect(nominal: Nominal) -> Ty {
        Ty::new(TypeValue::Indirect(nominal))
    }

    pub fn value(&self) -> &TypeValue {
        &self.0
    }

    /// Are both handles the *same* type, not merely equal ones
    pub fn is(&self, other: &Ty) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The instantiation this type was produced by, if any
    pub fn nominal(&self) -> Option<&Nominal> {
        match self.value() {
            TypeValue::Struct(s) => s.nominal.as_ref(),
            TypeValue::Enum(e) => e.nominal.as_ref(),
            TypeValue::Indirect(n) => Some(n),
            _ => None,
        }
    }

    /// Field of a struct, or payload of an enum variant
    pub fn member(&self, name: Symbol) -> Option<&Ty> {
        let members = match self.value() {
            TypeValue::Struct(s) => &s.fields,
            TypeValue::Enum(e) => &e.variants,
            _ => return None,
        };

        members.iter().find(|(n, _)| *n == name).map(|(_, ty)| ty)
    }

    pub fn members(&self) -> &[(Symbol, Ty)] {
        match self.value() {
            TypeValue::Struct(s) => &s.fields,
            TypeValue::Enum(e) => &e.variants,
            _ => &[],
        }
    }

    pub fn method(&self, name: Symbol) -> Option<&Function> {
        self.methods().and_then(|methods| methods.get(&name))
    }

    pub fn methods(&self) -> Option<&BTreeMap<Symbol, Function>> {
        match self.value() {
            TypeValue::Struct(s) => Some(&s.methods),
            TypeValue::Enum(e) => Some(&e.methods),
            _ => None,
        }
    }

    /// The component types of a structural type: tuple elements, pointee, array
    /// element, function pointer parameters and return type. Nominal and primitive
    /// types have no components.
    pub fn components(&self) -> Option<Vec<&Ty>> {
        match self.value() {
            TypeValue::Pointer(to) => Some(vec![to]),
            TypeValue::Array { element, .. } => Some(vec![element]),
            TypeValue::Tuple(elements) => Some(elements.iter().collect()),
            TypeValue::FunctionPointer { params, ret } => {
                Some(params.iter().chain(std::iter::once(ret)).collect())
            }
            _ => None,
        }
    }
}

impl PartialEq for Ty {
    fn eq(&self, other: &Ty) -> bool {
        self.is(other) || self.0 == other.0
    }
}

impl Eq for Ty {}

impl Hash for Ty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialOrd for Ty {
    fn partial_cmp(&self, other: &Ty) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ty {
    fn cmp(&self, other: &Ty) -> Ordering {
        if self.is(other) {
            Ordering::Equal
        } else {
            self.0.cmp(&other.0)
        }
    }
}

impl Debug for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}
