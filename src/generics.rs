//! The generic façade is the only way to call a type constructor. A call checks the
//! arguments against the constructor's parameters, then goes through the instantiation
//! cache, which runs the constructor's body on a miss. Nested calls performed by that body
//! come back here, through the [`Instantiate`] trait.

use capability::CapabilityRegistry;
use ctfe::{Evaluator, Instantiate};
use error::{ErrKind, Error};
use instance_cache::InstantiationCache;
use location::SpanTuple;
use logger::log;
use symbol::Symbol;
use typeval::{Args, CtorId, Nominal, Ty};

use crate::Constructors;

pub struct Generics<'ctx> {
    registry: &'ctx CapabilityRegistry,
    constructors: &'ctx Constructors,
    cache: &'ctx mut InstantiationCache,
}

impl<'ctx> Generics<'ctx> {
    pub fn new(
        registry: &'ctx CapabilityRegistry,
        constructors: &'ctx Constructors,
        cache: &'ctx mut InstantiationCache,
    ) -> Generics<'ctx> {
        Generics {
            registry,
            constructors,
            cache,
        }
    }

    /// Call `ctor` with `args`. `site` is where the call happens, and is used to locate
    /// errors which could not be located any better.
    pub fn call(&mut self, ctor: CtorId, args: Args, site: &SpanTuple) -> Result<Ty, Error> {
        let registry = self.registry;
        let constructors = self.constructors;

        let constructor = constructors.get(ctor).ok_or_else(|| {
            Error::new(ErrKind::UnknownName)
                .with_msg(format!("`{}` was never declared", ctor.name()))
                .with_loc(site.clone())
        })?;

        if constructor.params.len() != args.len() {
            return Err(Error::new(ErrKind::Arity)
                .with_msg(format!(
                    "`{}` expects {} arguments, got {}",
                    ctor.name(),
                    constructor.params.len(),
                    args.len()
                ))
                .with_loc(site.clone())
                .or_instantiation(ctor.name(), ctor.origin(), &args)
                .with_hint(
                    Error::hint()
                        .with_msg(format!("`{}` declared here", ctor.name()))
                        .with_loc(constructor.location.clone()),
                ));
        }

        log!(generics, "call to `{}({})`", ctor.name(), args);

        self.cache
            .get_or_create(ctor, args.clone(), |cache| {
                let mut nested = Generics::new(registry, constructors, cache);

                Evaluator::new(registry, &mut nested, Nominal::new(ctor, args.clone()))
                    .evaluate(constructor)
            })
            .map_err(|e| e.or_loc(site).or_instantiation(ctor.name(), ctor.origin(), &args))
    }
}

impl Instantiate for Generics<'_> {
    fn instantiate(&mut self, ctor: CtorId, args: Args, site: &SpanTuple) -> Result<Ty, Error> {
        self.call(ctor, args, site)
    }

    fn lookup(&self, name: Symbol) -> Option<CtorId> {
        self.constructors.lookup(name)
    }
}
