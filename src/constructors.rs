//! The table of declared type constructors. Declaring a constructor allocates its
//! [`CtorId`]: declaring a second constructor with the same name shadows the first one for
//! name lookups, but both keep producing their own, distinct types.

use std::collections::HashMap;

use ctfe::{Body, Constructor};
use location::SpanTuple;
use symbol::Symbol;
use typeval::CtorId;

#[derive(Default)]
pub struct Constructors {
    declared: Vec<Constructor>,
    by_name: HashMap<Symbol, CtorId>,
}

impl Constructors {
    pub fn new() -> Constructors {
        Constructors::default()
    }

    pub fn declare(
        &mut self,
        name: Symbol,
        params: Vec<Symbol>,
        body: Body,
        location: SpanTuple,
    ) -> CtorId {
        let id = CtorId::new(self.declared.len() as u64, name);

        self.declared.push(Constructor {
            id,
            params,
            body,
            location,
        });
        self.by_name.insert(name, id);

        id
    }

    /// Find the latest constructor declared with that name
    pub fn lookup(&self, name: Symbol) -> Option<CtorId> {
        self.by_name.get(&name).copied()
    }

    pub fn get(&self, id: CtorId) -> Option<&Constructor> {
        self.declared
            .get(id.origin() as usize)
            .filter(|ctor| ctor.id == id)
    }

    /// Names of the constructors visible by name, in declaration order
    pub fn names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.declared
            .iter()
            .filter(|ctor| self.lookup(ctor.id.name()) == Some(ctor.id))
            .map(|ctor| ctor.id.name())
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}
