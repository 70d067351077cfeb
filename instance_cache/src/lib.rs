//! The instantiation cache is the only way constructors ever get evaluated. It maps an
//! instantiation, meaning a constructor together with its arguments, to the type that
//! instantiation produced. A given instantiation is evaluated at most once per cache, and
//! every later request returns the very same [`Ty`] handle.
//!
//! Failed evaluations are never stored: the next request for the same instantiation
//! evaluates it again. An instantiation requested again while it is still being
//! evaluated is a cycle, and is reported as such instead of recursing forever.

use std::collections::{HashMap, HashSet};

use error::{ErrKind, Error};
use logger::log;
use typeval::{Args, CtorId, Nominal, Ty};

#[derive(Default)]
pub struct InstantiationCache {
    entries: HashMap<Nominal, Ty>,
    in_progress: HashSet<Nominal>,
}

impl InstantiationCache {
    pub fn new() -> InstantiationCache {
        InstantiationCache::default()
    }

    /// Return the type produced by `ctor(args)`, evaluating it with `evaluate` if this
    /// instantiation was never successfully performed. The evaluation function gets the
    /// cache back, so that it can perform nested instantiations.
    pub fn get_or_create<F>(&mut self, ctor: CtorId, args: Args, evaluate: F) -> Result<Ty, Error>
    where
        F: FnOnce(&mut InstantiationCache) -> Result<Ty, Error>,
    {
        let key = Nominal::new(ctor, args);

        if let Some(ty) = self.entries.get(&key) {
            log!(cache, "hit: `{key}`");
            return Ok(ty.clone());
        }

        if !self.in_progress.insert(key.clone()) {
            return Err(Error::new(ErrKind::CyclicInstantiation)
                .with_msg(format!("`{key}` depends on itself")));
        }

        log!(cache, "miss: `{key}`");

        let result = evaluate(self);
        self.in_progress.remove(&key);

        let ty = result?;

        // a recursive instantiation may have been completed in the meantime
        let ty = self.entries.entry(key).or_insert(ty).clone();

        Ok(ty)
    }

    /// Lookup an instantiation without ever evaluating it
    pub fn get(&self, ctor: CtorId, args: &Args) -> Option<&Ty> {
        self.entries.get(&Nominal::new(ctor, args.clone()))
    }

    /// Is this instantiation currently being evaluated
    pub fn is_in_progress(&self, ctor: CtorId, args: &Args) -> bool {
        self.in_progress.contains(&Nominal::new(ctor, args.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All successful instantiations, ordered by constructor and then by arguments
    pub fn iter(&self) -> impl Iterator<Item = (&Nominal, &Ty)> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

        entries.into_iter()
    }
}
