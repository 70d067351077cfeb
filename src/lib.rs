//! Compile-time type constructors. A type constructor is a function evaluated during
//! compilation which takes types (and other compile-time values) and produces a type,
//! such as `hashmap(key, value)`. Constructors may assert that their arguments implement
//! traits, and may attach methods to the type they build before it is finalized.
//!
//! Calling a constructor twice with the same arguments produces the *same* type: this is
//! what makes `hashmap(i32, string)` in one place and `hashmap(i32, string)` in another
//! the same type.
//!
//! ```text
//! Compilation::instantiate --> Generics::call --> InstantiationCache::get_or_create
//!                                  ^                          | (miss)
//!                                  |                          v
//!                                  +---- nested calls ---- Evaluator --> CapabilityRegistry
//! ```

mod compilation;
mod constructors;
mod generics;

pub use compilation::{Compilation, SharedCompilation};
pub use constructors::Constructors;
pub use generics::Generics;

pub use capability::CapabilityRegistry;
pub use ctfe::{builder, Body, Constructor, Expr, Instantiate};
pub use error::{ErrKind, Error, ErrorHandler};
pub use instance_cache::InstantiationCache;
pub use location::SpanTuple;
pub use symbol::Symbol;
pub use typeval::{Args, CtorId, Nominal, Ty, TypeValue, Value};

/// Settings for a compilation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Load the builtin traits, facts, rules and prelude constructors
    pub prelude: bool,
    /// Enable logging for the whole process
    pub log: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prelude: true,
            log: false,
        }
    }
}
