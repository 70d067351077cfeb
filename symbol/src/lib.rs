//! Interned symbol crate. Creating a symbol will either create a new one, or return a
//! "hidden reference" to an existing symbol. This allows reusing allocations and is
//! useful in contexts where the same string might be reused multiple times: field names,
//! trait names and constructor names are compared and hashed constantly while
//! instantiating generic types, so comparing two symbols only compares their contents
//! once they have been interned.

// The table is a `static` behind a mutex rather than a `SymbolCtx` passed around: symbols
// are created by the front end, the builtins and the evaluator alike, and threading a
// context through all of them for strings that never die is not worth it.

use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Mutex;

use lazy_static::lazy_static;

lazy_static! {
    static ref SYMBOLS: Mutex<HashSet<&'static str>> = {
        macro_rules! builtin {
            ($set:expr, $builtin:literal) => {
                $set.insert($builtin)
            };
        }

        let mut set = HashSet::new();

        // All primitive types
        builtin!(set, "i8");
        builtin!(set, "i16");
        builtin!(set, "i32");
        builtin!(set, "i64");
        builtin!(set, "u8");
        builtin!(set, "u16");
        builtin!(set, "u32");
        builtin!(set, "u64");
        builtin!(set, "bool");
        builtin!(set, "f32");
        builtin!(set, "f64");
        builtin!(set, "string");
        builtin!(set, "type");
        // Not a keyword, but the name of the method most constructors attach
        builtin!(set, "new");

        Mutex::new(set)
    };
}

/// An interned string. Two symbols created from equal strings point to the same
/// allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(&'static str);

impl Symbol {
    /// # Panics
    ///
    /// This function panics if the underlying mutex is poisoned
    #[must_use]
    pub fn new(inner: &str) -> Symbol {
        let mut set = SYMBOLS.lock().unwrap();

        // FIXME: Use `get_or_insert_with` once `hash_set_entry` gets stabilized
        match set.get(inner) {
            Some(existing) => Symbol(existing),
            None => {
                let leaked: &'static str = Box::leak(inner.to_owned().into_boxed_str());
                set.insert(leaked);

                Symbol(leaked)
            }
        }
    }

    pub fn access(&self) -> &'static str {
        self.0
    }
}

impl From<&str> for Symbol {
    fn from(inner: &str) -> Symbol {
        Symbol::new(inner)
    }
}

impl From<String> for Symbol {
    fn from(inner: String) -> Symbol {
        Symbol::new(&inner)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "`{}`", self.0)
    }
}
