//! Everything the toolchain knows about before any user code is read: primitive types,
//! intrinsic traits and the facts and rules about them, and a small prelude of type
//! constructors.

mod prelude;

pub use prelude::{prelude, Builtin};

use capability::CapabilityRegistry;
use error::Error;
use symbol::Symbol;
use typeval::{IntegerWidth, Ty};

pub const TOTALORD: &str = "totalord";
pub const EQ: &str = "eq";
pub const HASH: &str = "hash";
pub const COPY: &str = "copy";

pub const TRAITS: &[&str] = &[TOTALORD, EQ, HASH, COPY];

/// Primitive types do not come from a constructor. They are built from scratch every time
/// they are needed, and compared by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Int(IntegerWidth, bool),
    Bool,
    Float(bool),
    Unit,
}

impl Primitive {
    pub fn ty(&self) -> Ty {
        match self {
            Primitive::Int(width, signed) => Ty::integer(*width, *signed),
            Primitive::Bool => Ty::bool(),
            Primitive::Float(double) => Ty::float(*double),
            Primitive::Unit => Ty::unit(),
        }
    }

    /// Intrinsic traits implemented by the primitive
    pub fn traits(&self) -> &'static [&'static str] {
        match self {
            Primitive::Int(..) | Primitive::Bool => &[TOTALORD, EQ, COPY],
            Primitive::Float(_) => &[COPY],
            Primitive::Unit => &[EQ, COPY],
        }
    }
}

pub const PRIMITIVES: &[(&str, Primitive)] = &[
    ("i8", Primitive::Int(IntegerWidth::Eight, true)),
    ("i16", Primitive::Int(IntegerWidth::Sixteen, true)),
    ("i32", Primitive::Int(IntegerWidth::ThirtyTwo, true)),
    ("i64", Primitive::Int(IntegerWidth::SixtyFour, true)),
    ("u8", Primitive::Int(IntegerWidth::Eight, false)),
    ("u16", Primitive::Int(IntegerWidth::Sixteen, false)),
    ("u32", Primitive::Int(IntegerWidth::ThirtyTwo, false)),
    ("u64", Primitive::Int(IntegerWidth::SixtyFour, false)),
    ("bool", Primitive::Bool),
    ("f32", Primitive::Float(false)),
    ("f64", Primitive::Float(true)),
    ("unit", Primitive::Unit),
];

pub fn primitive(name: &str) -> Option<Ty> {
    PRIMITIVES
        .iter()
        .find(|(prim, _)| *prim == name)
        .map(|(_, prim)| prim.ty())
}

/// Declare the intrinsic traits, record their facts for every primitive type and register
/// the derivation rules between them.
pub fn intrinsics(registry: &mut CapabilityRegistry) -> Result<(), Error> {
    TRAITS
        .iter()
        .for_each(|trait_name| registry.declare(Symbol::from(*trait_name)));

    PRIMITIVES.iter().for_each(|(_, prim)| {
        prim.traits()
            .iter()
            .for_each(|trait_name| registry.record(Symbol::from(*trait_name), prim.ty()))
    });

    registry.derive(Symbol::from(HASH), vec![Symbol::from(EQ)])?;
    registry.derive_structural(Symbol::from(EQ));
    registry.derive_structural(Symbol::from(COPY));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(registry: &CapabilityRegistry, trait_name: &str, ty: &Ty) -> bool {
        registry.query(Symbol::from(trait_name), ty).unwrap()
    }

    #[test]
    fn primitive_lookup() {
        assert_eq!(
            primitive("u16"),
            Some(Ty::integer(IntegerWidth::Sixteen, false))
        );
        assert_eq!(primitive("f64"), Some(Ty::float(true)));
        assert_eq!(primitive("string"), None);
    }

    #[test]
    fn primitive_names_render_back() {
        PRIMITIVES
            .iter()
            .for_each(|(name, prim)| assert_eq!(prim.ty().to_string(), *name));
    }

    #[test]
    fn intrinsic_facts() {
        let mut registry = CapabilityRegistry::new();
        intrinsics(&mut registry).unwrap();

        let i32 = Ty::integer(IntegerWidth::ThirtyTwo, true);

        assert!(query(&registry, TOTALORD, &i32));
        assert!(query(&registry, TOTALORD, &Ty::bool()));
        assert!(!query(&registry, TOTALORD, &Ty::float(false)));
        assert!(!query(&registry, EQ, &Ty::float(true)));
    }

    #[test]
    fn hash_follows_eq() {
        let mut registry = CapabilityRegistry::new();
        intrinsics(&mut registry).unwrap();

        assert!(query(&registry, HASH, &Ty::unit()));
        assert!(!query(&registry, HASH, &Ty::float(false)));
    }

    #[test]
    fn structural_rules() {
        let mut registry = CapabilityRegistry::new();
        intrinsics(&mut registry).unwrap();

        let pair = Ty::tuple(vec![Ty::bool(), Ty::float(false)]);

        assert!(query(&registry, COPY, &pair));
        assert!(!query(&registry, EQ, &pair));
        // no structural rule for ordering
        assert!(!query(&registry, TOTALORD, &Ty::tuple(vec![Ty::bool()])));
    }

    #[test]
    fn intrinsics_twice() {
        let mut registry = CapabilityRegistry::new();

        intrinsics(&mut registry).unwrap();
        let facts = registry.fact_count();
        intrinsics(&mut registry).unwrap();

        assert_eq!(registry.fact_count(), facts);
    }
}
