//! Types under construction. A constructor body works on a [`TypeBuilder`]: it may add
//! or rewrite members and attach methods, until the builder is [`TypeBuilder::finish`]ed
//! into an immutable [`Ty`]. There is no way back from a [`Ty`] to a builder.

use std::collections::{BTreeMap, HashSet};

use error::{ErrKind, Error};
use symbol::Symbol;

use crate::{EnumType, Function, Nominal, StructType, Ty, TypeValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Struct,
    Enum,
}

#[derive(Clone, Debug)]
pub struct TypeBuilder {
    shape: Shape,
    members: Vec<(Symbol, Ty)>,
    methods: BTreeMap<Symbol, Function>,
}

fn duplicate(shape: Shape, name: Symbol) -> Error {
    let what = match shape {
        Shape::Struct => "field",
        Shape::Enum => "variant",
    };

    Error::new(ErrKind::DuplicateMember).with_msg(format!("{what} `{name}` is declared twice"))
}

impl TypeBuilder {
    fn new(shape: Shape, members: Vec<(Symbol, Ty)>) -> Result<TypeBuilder, Error> {
        let mut seen = HashSet::new();
        if let Some((name, _)) = members.iter().find(|(name, _)| !seen.insert(*name)) {
            return Err(duplicate(shape, *name));
        }

        Ok(TypeBuilder {
            shape,
            members,
            methods: BTreeMap::new(),
        })
    }

    /// Start building a struct from an ordered list of fields
    pub fn structure(fields: impl IntoIterator<Item = (Symbol, Ty)>) -> Result<TypeBuilder, Error> {
        TypeBuilder::new(Shape::Struct, fields.into_iter().collect())
    }

    /// Start building an enum from an ordered list of variants and their payloads
    pub fn enumeration(
        variants: impl IntoIterator<Item = (Symbol, Ty)>,
    ) -> Result<TypeBuilder, Error> {
        TypeBuilder::new(Shape::Enum, variants.into_iter().collect())
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn member(&self, name: Symbol) -> Option<&Ty> {
        self.members
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, ty)| ty)
    }

    pub fn method(&self, name: Symbol) -> Option<&Function> {
        self.methods.get(&name)
    }

    /// Rewrite an existing member, or append a new one at the end of the definition
    pub fn set_member(&mut self, name: Symbol, ty: Ty) -> Result<(), Error> {
        if self.methods.contains_key(&name) {
            return Err(duplicate(self.shape, name)
                .with_msg(format!("`{name}` is already the name of a method")));
        }

        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = ty,
            None => self.members.push((name, ty)),
        }

        Ok(())
    }

    /// Attach a method under the given name. Attaching a second method with the same name
    /// replaces the first one.
    pub fn attach_method(&mut self, name: Symbol, function: Function) -> Result<(), Error> {
        if self.member(name).is_some() {
            return Err(duplicate(self.shape, name)
                .with_msg(format!("cannot attach method `{name}`: a member has the same name")));
        }

        self.methods.insert(name, function);

        Ok(())
    }

    /// Freeze the builder into an immutable type
    pub fn finish(self, nominal: Option<Nominal>) -> Ty {
        let TypeBuilder {
            shape,
            members,
            methods,
        } = self;

        let value = match shape {
            Shape::Struct => TypeValue::Struct(StructType {
                nominal,
                fields: members,
                methods,
            }),
            Shape::Enum => TypeValue::Enum(EnumType {
                nominal,
                variants: members,
                methods,
            }),
        };

        Ty::new(value)
    }
}
