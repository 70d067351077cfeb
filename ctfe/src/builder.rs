//! Very simple body builder module, not suitable for general use - this is for builtin
//! constructors and tests, which do not come from a parsed source file. Everything built
//! here is located at [`SpanTuple::builtin`].

use location::SpanTuple;
use symbol::Symbol;
use typeval::{BodyRef, Ty, Value};

use crate::ast::{Body, Expr, Place, Stmt, StmtKind};

fn boxed(e: Expr) -> Box<Expr> {
    Box::new(e)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt {
        kind,
        location: SpanTuple::builtin(),
    }
}

pub fn var(name: &str) -> Expr {
    Expr::Var(Symbol::from(name))
}

pub fn ty(ty: Ty) -> Expr {
    Expr::Const(Value::Type(ty))
}

pub fn int(value: i64) -> Expr {
    Expr::Const(Value::Int(value))
}

pub fn boolean(value: bool) -> Expr {
    Expr::Const(Value::Bool(value))
}

pub fn member(base: Expr, name: &str) -> Expr {
    Expr::Member(boxed(base), Symbol::from(name))
}

pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: boxed(var(callee)),
        args,
    }
}

pub fn call_value(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: boxed(callee),
        args,
    }
}

pub fn has_impl(trait_name: &str, ty: Expr) -> Expr {
    Expr::HasImpl {
        trait_name: Symbol::from(trait_name),
        ty: boxed(ty),
    }
}

pub fn not(e: Expr) -> Expr {
    Expr::Not(boxed(e))
}

pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    Expr::And(boxed(lhs), boxed(rhs))
}

pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Or(boxed(lhs), boxed(rhs))
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Eq(boxed(lhs), boxed(rhs))
}

pub fn if_else(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
    Expr::If {
        cond: boxed(cond),
        then: boxed(then),
        otherwise: boxed(otherwise),
    }
}

pub fn tuple(elements: Vec<Expr>) -> Expr {
    Expr::Tuple(elements)
}

pub fn tuple_type(elements: Vec<Expr>) -> Expr {
    Expr::TupleType(elements)
}

pub fn pointer(to: Expr) -> Expr {
    Expr::Pointer(boxed(to))
}

pub fn array(element: Expr, len: Expr) -> Expr {
    Expr::Array {
        element: boxed(element),
        len: boxed(len),
    }
}

pub fn function_pointer(params: Vec<Expr>, ret: Expr) -> Expr {
    Expr::FunctionPointer {
        params,
        ret: boxed(ret),
    }
}

pub fn structure(fields: Vec<(&str, Expr)>) -> Expr {
    Expr::Struct(
        fields
            .into_iter()
            .map(|(name, e)| (Symbol::from(name), e))
            .collect(),
    )
}

pub fn enumeration(variants: Vec<(&str, Expr)>) -> Expr {
    Expr::Enum(
        variants
            .into_iter()
            .map(|(name, e)| (Symbol::from(name), e))
            .collect(),
    )
}

pub fn function(name: &str, params: Vec<Expr>, ret: Expr, body: u64) -> Expr {
    Expr::Function {
        name: Symbol::from(name),
        params,
        ret: boxed(ret),
        body: BodyRef(body),
    }
}

pub fn map(entries: Vec<(Expr, Expr)>) -> Expr {
    Expr::Map(entries)
}

pub fn map_get(map: Expr, key: Expr, or_else: Expr) -> Expr {
    Expr::MapGet {
        map: boxed(map),
        key: boxed(key),
        or_else: boxed(or_else),
    }
}

pub fn self_type() -> Expr {
    Expr::SelfType
}

pub fn binding(name: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Binding {
        name: Symbol::from(name),
        mutable: false,
        value,
    })
}

pub fn mutable(name: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Binding {
        name: Symbol::from(name),
        mutable: true,
        value,
    })
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Assign {
        place: Place::Var(Symbol::from(name)),
        value,
    })
}

pub fn assign_member(var: &str, member: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Assign {
        place: Place::Member {
            var: Symbol::from(var),
            member: Symbol::from(member),
        },
        value,
    })
}

pub fn assert(cond: Expr) -> Stmt {
    stmt(StmtKind::Assert(cond))
}

pub fn expr(e: Expr) -> Stmt {
    stmt(StmtKind::Expr(e))
}

pub fn body(stmts: Vec<Stmt>, result: Expr) -> Body {
    Body {
        stmts,
        result,
        result_location: SpanTuple::builtin(),
    }
}
