//! Constructor bodies, as handed to us by the front end. Names have already been parsed
//! into [`Symbol`]s and literals into [`Value`]s, but nothing has been evaluated yet.

use location::SpanTuple;
use symbol::Symbol;
use typeval::{BodyRef, CtorId, Value};

/// A declared type constructor
#[derive(Clone, Debug)]
pub struct Constructor {
    pub id: CtorId,
    pub params: Vec<Symbol>,
    pub body: Body,
    pub location: SpanTuple,
}

#[derive(Clone, Debug)]
pub struct Body {
    pub stmts: Vec<Stmt>,
    /// The produced type
    pub result: Expr,
    pub result_location: SpanTuple,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SpanTuple,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    /// `let name = value` or `mut name = value`
    Binding {
        name: Symbol,
        mutable: bool,
        value: Expr,
    },
    /// `name = value` or `name.member = value`
    Assign { place: Place, value: Expr },
    Assert(Expr),
    Expr(Expr),
}

#[derive(Clone, Debug)]
pub enum Place {
    Var(Symbol),
    Member { var: Symbol, member: Symbol },
}

#[derive(Clone, Debug)]
pub enum Expr {
    Var(Symbol),
    Const(Value),
    /// Field, variant payload or method of a type
    Member(Box<Expr>, Symbol),
    /// Constructor call
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    HasImpl {
        trait_name: Symbol,
        ty: Box<Expr>,
    },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Tuple of values, `(a, b)`
    Tuple(Vec<Expr>),
    /// Tuple type, `tuple(a, b)`
    TupleType(Vec<Expr>),
    Pointer(Box<Expr>),
    Array {
        element: Box<Expr>,
        len: Box<Expr>,
    },
    FunctionPointer {
        params: Vec<Expr>,
        ret: Box<Expr>,
    },
    Struct(Vec<(Symbol, Expr)>),
    Enum(Vec<(Symbol, Expr)>),
    Function {
        name: Symbol,
        params: Vec<Expr>,
        ret: Box<Expr>,
        body: BodyRef,
    },
    Map(Vec<(Expr, Expr)>),
    /// `map.get(key).or_else(default)`: `default` is only evaluated on a miss, and is
    /// never inserted into the map
    MapGet {
        map: Box<Expr>,
        key: Box<Expr>,
        or_else: Box<Expr>,
    },
    /// The type currently being instantiated, as an indirection
    SelfType,
}
