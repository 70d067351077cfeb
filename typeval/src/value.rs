use std::collections::BTreeMap;

use symbol::Symbol;

use crate::{CtorId, Ty};

/// Opaque handle to the body of a function, owned by the front end. Compile-time
/// evaluation never looks inside function bodies: it only moves functions around and
/// attaches them to types as methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyRef(pub u64);

/// A function value, as attached to a type's method table
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<Ty>,
    pub ret: Ty,
    pub body: BodyRef,
}

impl Function {
    /// The function's signature as a function pointer type
    pub fn signature(&self) -> Ty {
        Ty::function_pointer(self.params.clone(), self.ret.clone())
    }
}

/// An ordered compile-time map. This is the same machinery the instantiation cache relies
/// on, exposed to constructor bodies: any [`Value`] can be used as a key, including
/// types and constructors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapValue(BTreeMap<Value, Value>);

impl MapValue {
    pub fn new() -> MapValue {
        MapValue::default()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Return a copy of the map with an extra entry. Values are immutable, so maps are
    /// never modified in place.
    pub fn with(&self, key: Value, value: Value) -> MapValue {
        let mut inner = self.0.clone();
        inner.insert(key, value);

        MapValue(inner)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> MapValue {
        MapValue(iter.into_iter().collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Str(Symbol),
    Type(Ty),
    Tuple(Vec<Value>),
    Function(Function),
    Constructor(CtorId),
    Map(MapValue),
}

impl Value {
    /// Name of the kind of value, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Type(_) => "type",
            Value::Tuple(_) => "tuple",
            Value::Function(_) => "function",
            Value::Constructor(_) => "constructor",
            Value::Map(_) => "map",
        }
    }

    pub fn as_type(&self) -> Option<&Ty> {
        match self {
            Value::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Ty> for Value {
    fn from(ty: Ty) -> Value {
        Value::Type(ty)
    }
}

/// The arguments given to a constructor, in declared parameter order. Together with the
/// constructor's identity, this is what the instantiation cache is keyed on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn empty() -> Args {
        Args::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Args {
        Args(values)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Args {
        Args(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntegerWidth;

    #[test]
    fn types_as_map_keys() {
        let key = Value::Tuple(vec![
            Ty::integer(IntegerWidth::ThirtyTwo, true).into(),
            Ty::bool().into(),
        ]);
        let map = MapValue::new().with(key, Value::Int(15));

        // a structurally equal key, built separately
        let lookup = Value::Tuple(vec![
            Ty::integer(IntegerWidth::ThirtyTwo, true).into(),
            Ty::bool().into(),
        ]);

        assert_eq!(map.get(&lookup), Some(&Value::Int(15)));
    }

    #[test]
    fn with_does_not_modify() {
        let map = MapValue::new();
        let bigger = map.with(Value::Int(1), Value::Unit);

        assert!(map.is_empty());
        assert_eq!(bigger.len(), 1);
    }

    #[test]
    fn args_compare_elementwise() {
        let a = Args::from(vec![Value::Int(1), Value::Int(2)]);
        let b = Args::from(vec![Value::Int(1), Value::Int(3)]);

        assert!(a < b);
        assert_ne!(a, Args::from(vec![Value::Int(2), Value::Int(1)]));
    }
}
