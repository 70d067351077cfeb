//! Types are displayed the way users write them. Types produced by a constructor are
//! displayed by the instantiation they come from, e.g. `hashmap(i32, string)`; use the
//! alternate flag (`{:#}`) to print their members and methods as well.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{Args, Function, MapValue, Nominal, Ty, TypeValue, Value};

fn comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> FmtResult {
    for (idx, item) in items.iter().enumerate() {
        if idx != 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }

    Ok(())
}

impl Display for Nominal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.ctor().name())?;
        if !self.args().is_empty() {
            write!(f, "({})", self.args())?;
        }

        Ok(())
    }
}

impl Display for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        comma_separated(f, self.as_slice())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "fun {}(", self.name)?;
        comma_separated(f, &self.params)?;
        write!(f, ") -> {}", self.ret)
    }
}

impl Display for MapValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{{")?;
        for (idx, (k, v)) in self.iter().enumerate() {
            if idx != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Unit => write!(f, "unit"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{:?}", s.access()),
            Value::Type(ty) => write!(f, "{ty}"),
            Value::Tuple(elements) => {
                write!(f, "(")?;
                comma_separated(f, elements)?;
                if elements.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Function(function) => write!(f, "{function}"),
            Value::Constructor(ctor) => write!(f, "{}", ctor.name()),
            Value::Map(map) => write!(f, "{map}"),
        }
    }
}

fn members(
    f: &mut Formatter<'_>,
    keyword: &str,
    members: &[(symbol::Symbol, Ty)],
    methods: &std::collections::BTreeMap<symbol::Symbol, Function>,
) -> FmtResult {
    write!(f, "{keyword} {{ ")?;
    for (idx, (name, ty)) in members.iter().enumerate() {
        if idx != 0 {
            write!(f, ", ")?;
        }
        write!(f, "{name}: {ty}")?;
    }
    for (name, function) in methods.iter() {
        write!(f, "; {name} = {function}")?;
    }
    write!(f, " }}")
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.value() {
            TypeValue::Integer { width, signed } => {
                let prefix = if *signed { 'i' } else { 'u' };
                write!(f, "{prefix}{}", width.bits())
            }
            TypeValue::Bool => write!(f, "bool"),
            TypeValue::Float { double: false } => write!(f, "f32"),
            TypeValue::Float { double: true } => write!(f, "f64"),
            TypeValue::Pointer(to) => write!(f, "*{to}"),
            TypeValue::FunctionPointer { params, ret } => {
                write!(f, "fun(")?;
                comma_separated(f, params)?;
                write!(f, ") -> {ret}")
            }
            TypeValue::Array { element, len } => write!(f, "[{len}]{element}"),
            TypeValue::Type => write!(f, "type"),
            TypeValue::Unit => write!(f, "unit"),
            TypeValue::Tuple(elements) => {
                write!(f, "(")?;
                comma_separated(f, elements)?;
                if elements.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            TypeValue::Struct(s) => match (&s.nominal, f.alternate()) {
                (Some(nominal), false) => write!(f, "{nominal}"),
                (Some(nominal), true) => {
                    write!(f, "{nominal} = ")?;
                    members(f, "struct", &s.fields, &s.methods)
                }
                (None, _) => members(f, "struct", &s.fields, &s.methods),
            },
            TypeValue::Enum(e) => match (&e.nominal, f.alternate()) {
                (Some(nominal), false) => write!(f, "{nominal}"),
                (Some(nominal), true) => {
                    write!(f, "{nominal} = ")?;
                    members(f, "enum", &e.variants, &e.methods)
                }
                (None, _) => members(f, "enum", &e.variants, &e.methods),
            },
            TypeValue::Indirect(nominal) => write!(f, "{nominal}"),
        }
    }
}
