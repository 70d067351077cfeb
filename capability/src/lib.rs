//! The capability registry keeps track of which types implement which traits. A trait is
//! only ever satisfied by an explicit fact, `(trait, type)`, or by a derivation rule
//! which was explicitly registered: there is no implicit, structural trait satisfaction.
//!
//! The registry is append-only for the duration of a compilation run. Constructor bodies
//! only ever get a shared reference to it, which means a constructor can only observe the
//! facts registered before its evaluation started.

use std::collections::{HashMap, HashSet};

use error::{ErrKind, Error};
use logger::log;
use symbol::Symbol;
use typeval::Ty;

#[derive(Default, Debug)]
pub struct CapabilityRegistry {
    traits: HashSet<Symbol>,
    facts: HashMap<Symbol, HashSet<Ty>>,
    // trait -> sets of traits which, when all implemented, imply it
    implied: HashMap<Symbol, Vec<Vec<Symbol>>>,
    structural: HashSet<Symbol>,
}

impl CapabilityRegistry {
    pub fn new() -> CapabilityRegistry {
        CapabilityRegistry::default()
    }

    /// Make a trait known to the registry, without any implementation
    pub fn declare(&mut self, trait_name: Symbol) {
        self.traits.insert(trait_name);
    }

    pub fn is_declared(&self, trait_name: Symbol) -> bool {
        self.traits.contains(&trait_name)
    }

    /// Record that `ty` implements `trait_name`. Recording the same fact twice is fine.
    pub fn record(&mut self, trait_name: Symbol, ty: Ty) {
        log!(capability, "{ty}: {trait_name}");

        self.declare(trait_name);
        self.facts.entry(trait_name).or_default().insert(ty);
    }

    /// Every type implementing all of `requires` implements `trait_name` as well.
    ///
    /// Rules may not form cycles: if `trait_name` is (transitively) required by one of
    /// its own requirements, the rule is rejected and the registry is left untouched.
    pub fn derive(&mut self, trait_name: Symbol, requires: Vec<Symbol>) -> Result<(), Error> {
        if let Some(path) = requires
            .iter()
            .find_map(|req| self.path_to(*req, trait_name, &mut HashSet::new()))
        {
            let cycle = path
                .iter()
                .rev()
                .map(Symbol::access)
                .collect::<Vec<_>>()
                .join(" <- ");

            return Err(Error::new(ErrKind::CapabilityCycle).with_msg(format!(
                "deriving `{trait_name}` from {requires:?} creates a cycle: {trait_name} <- {cycle}"
            )));
        }

        log!(capability, "{trait_name} <- {requires:?}");

        self.declare(trait_name);
        requires.iter().for_each(|req| self.declare(*req));
        self.implied.entry(trait_name).or_default().push(requires);

        Ok(())
    }

    /// Tuples, pointers, arrays and function pointers implement `trait_name` when all of
    /// their components do.
    pub fn derive_structural(&mut self, trait_name: Symbol) {
        log!(capability, "{trait_name} is structural");

        self.declare(trait_name);
        self.structural.insert(trait_name);
    }

    /// Path of implication edges going from `from` to `to`, if any
    fn path_to(
        &self,
        from: Symbol,
        to: Symbol,
        visited: &mut HashSet<Symbol>,
    ) -> Option<Vec<Symbol>> {
        if from == to {
            return Some(vec![from]);
        }
        if !visited.insert(from) {
            return None;
        }

        self.implied
            .get(&from)?
            .iter()
            .flatten()
            .find_map(|next| self.path_to(*next, to, visited))
            .map(|mut path| {
                path.push(from);
                path
            })
    }

    /// Does `ty` implement `trait_name`? Unknown traits are implemented by no one.
    pub fn has_impl(&self, trait_name: Symbol, ty: &Ty) -> bool {
        if self
            .facts
            .get(&trait_name)
            .map_or(false, |tys| tys.contains(ty))
        {
            return true;
        }

        if self.structural.contains(&trait_name) {
            if let Some(components) = ty.components() {
                if components.iter().all(|c| self.has_impl(trait_name, c)) {
                    return true;
                }
            }
        }

        self.implied.get(&trait_name).map_or(false, |rules| {
            rules
                .iter()
                .any(|requires| requires.iter().all(|req| self.has_impl(*req, ty)))
        })
    }

    /// Same as [`CapabilityRegistry::has_impl`], but asking about a trait nobody declared
    /// is an error
    pub fn query(&self, trait_name: Symbol, ty: &Ty) -> Result<bool, Error> {
        if !self.is_declared(trait_name) {
            return Err(Error::new(ErrKind::UndefinedCapability)
                .with_msg(format!("unknown trait `{trait_name}`")));
        }

        Ok(self.has_impl(trait_name, ty))
    }

    /// Amount of recorded facts, not counting derived ones
    pub fn fact_count(&self) -> usize {
        self.facts.values().map(HashSet::len).sum()
    }
}
