//! A [`Compilation`] owns everything a compilation run needs to instantiate types: the
//! capability registry, the declared constructors and the instantiation cache. It is
//! created when the run starts and dropped when it ends: two compilations never share
//! anything, besides the interned symbols.

use std::sync::{Arc, Mutex, MutexGuard};

use capability::CapabilityRegistry;
use ctfe::Body;
use error::{ErrKind, Error};
use instance_cache::InstantiationCache;
use location::SpanTuple;
use logger::log;
use symbol::Symbol;
use typeval::{Args, CtorId, Ty, Value};

use crate::{Config, Constructors, Generics};

pub struct Compilation {
    registry: CapabilityRegistry,
    constructors: Constructors,
    cache: InstantiationCache,
}

impl Compilation {
    /// Create a compilation with the default configuration, prelude included
    pub fn new() -> Result<Compilation, Error> {
        Compilation::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Compilation, Error> {
        if config.log {
            logger::enable();
        }

        let mut compilation = Compilation {
            registry: CapabilityRegistry::new(),
            constructors: Constructors::new(),
            cache: InstantiationCache::new(),
        };

        if config.prelude {
            compilation.load_prelude()?;
        }

        Ok(compilation)
    }

    fn load_prelude(&mut self) -> Result<(), Error> {
        log!(generics, "loading prelude");

        builtins::intrinsics(&mut self.registry)?;

        for builtin in builtins::prelude() {
            let params = builtin.params.iter().map(|p| Symbol::from(*p)).collect();
            let id = self.declare(
                Symbol::from(builtin.name),
                params,
                builtin.body,
                SpanTuple::builtin(),
            );

            if !builtin.implements.is_empty() {
                let ty = self.call(id, Args::empty())?;
                builtin
                    .implements
                    .iter()
                    .for_each(|trait_name| self.registry.record(Symbol::from(*trait_name), ty.clone()));
            }
        }

        Ok(())
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Facts and rules can be added at any point, but only instantiations evaluated
    /// afterwards will see them.
    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.registry
    }

    pub fn constructors(&self) -> &Constructors {
        &self.constructors
    }

    pub fn cache(&self) -> &InstantiationCache {
        &self.cache
    }

    pub fn declare(
        &mut self,
        name: Symbol,
        params: Vec<Symbol>,
        body: Body,
        location: SpanTuple,
    ) -> CtorId {
        log!(generics, "declaring `{name}`");

        self.constructors.declare(name, params, body, location)
    }

    pub fn lookup(&self, name: &str) -> Option<CtorId> {
        self.constructors.lookup(Symbol::from(name))
    }

    pub fn call(&mut self, ctor: CtorId, args: Args) -> Result<Ty, Error> {
        self.call_at(ctor, args, &SpanTuple::builtin())
    }

    pub fn call_at(&mut self, ctor: CtorId, args: Args, site: &SpanTuple) -> Result<Ty, Error> {
        Generics::new(&self.registry, &self.constructors, &mut self.cache).call(ctor, args, site)
    }

    /// Instantiate a constructor by name, with types as arguments
    pub fn instantiate(&mut self, name: &str, args: Vec<Ty>) -> Result<Ty, Error> {
        let ctor = self.lookup(name).ok_or_else(|| {
            Error::new(ErrKind::UnknownName)
                .with_msg(format!("no type constructor named `{name}`"))
        })?;

        self.call(ctor, args.into_iter().map(Value::Type).collect())
    }

    /// Resolve a type by name: either a primitive type, or a constructor without
    /// parameters.
    pub fn resolve(&mut self, name: &str) -> Result<Ty, Error> {
        match builtins::primitive(name) {
            Some(ty) => Ok(ty),
            None => self.instantiate(name, vec![]),
        }
    }
}

/// A compilation shared between threads. Every operation locks the whole compilation for
/// its entire duration, nested instantiations included.
#[derive(Clone)]
pub struct SharedCompilation(Arc<Mutex<Compilation>>);

impl SharedCompilation {
    pub fn new(compilation: Compilation) -> SharedCompilation {
        SharedCompilation(Arc::new(Mutex::new(compilation)))
    }

    fn lock(&self) -> MutexGuard<'_, Compilation> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn instantiate(&self, name: &str, args: Vec<Ty>) -> Result<Ty, Error> {
        self.lock().instantiate(name, args)
    }

    pub fn resolve(&self, name: &str) -> Result<Ty, Error> {
        self.lock().resolve(name)
    }

    /// Run `f` with exclusive access to the compilation
    pub fn with<T>(&self, f: impl FnOnce(&mut Compilation) -> T) -> T {
        let mut compilation = self.lock();

        f(&mut *compilation)
    }
}
