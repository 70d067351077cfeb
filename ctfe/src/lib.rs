//! Compile-time function evaluation, restricted to what type constructors need. The
//! [`Evaluator`] runs the body of one [`Constructor`] for one set of arguments, and
//! produces the resulting type.
//!
//! Statements are executed strictly in order. A body works on *working values*, types
//! under construction which are still mutable (see [`TypeBuilder`]). The body's result is
//! frozen once evaluation completes. If anything fails along the way, the working values
//! are simply dropped.
//!
//! Reading a working value which the body may return yields an indirection to the type
//! being instantiated, so that e.g. `fun new() -> kind` does not embed `kind` in itself.
//! Any other working value read as a type is finished as an anonymous type.
//!
//! The evaluator has no side effects besides reading the [`CapabilityRegistry`] and
//! requesting nested instantiations through the [`Instantiate`] trait, which is
//! implemented by the generic façade and routes them through the instantiation cache.

pub mod ast;
pub mod builder;

use std::collections::{HashMap, HashSet};

use capability::CapabilityRegistry;
use error::{ErrKind, Error};
use location::SpanTuple;
use logger::log;
use symbol::Symbol;
use typeval::{Args, Function, MapValue, Nominal, Ty, TypeBuilder, Value};

pub use ast::{Body, Constructor, Expr, Place, Stmt, StmtKind};

/// Everything the evaluator needs to know about other constructors
pub trait Instantiate {
    /// Instantiate another constructor (or the same one with other arguments) from within
    /// a body. `site` is the location of the statement performing the call.
    fn instantiate(
        &mut self,
        ctor: typeval::CtorId,
        args: Args,
        site: &SpanTuple,
    ) -> Result<Ty, Error>;

    /// Find a constructor by name, for names which are not bound in the body
    fn lookup(&self, name: Symbol) -> Option<typeval::CtorId>;
}

enum Slot {
    Value(Value),
    Working(TypeBuilder),
}

struct Binding {
    slot: Slot,
    mutable: bool,
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::new(ErrKind::TypeMismatch).with_msg(format!(
        "expected {expected}, found {} `{found}`",
        found.kind()
    ))
}

fn unknown(name: Symbol) -> Error {
    Error::new(ErrKind::UnknownName).with_msg(format!("`{name}` is not bound to anything"))
}

fn no_member(name: Symbol, on: &dyn std::fmt::Display) -> Error {
    Error::new(ErrKind::UnknownName).with_msg(format!("`{on}` has no member named `{name}`"))
}

pub struct Evaluator<'ctx, I: Instantiate + ?Sized> {
    registry: &'ctx CapabilityRegistry,
    instantiate: &'ctx mut I,
    current: Nominal,
    scope: HashMap<Symbol, Binding>,
    // bindings which may become the produced type
    produced: HashSet<Symbol>,
    site: SpanTuple,
}

impl<'ctx, I: Instantiate + ?Sized> Evaluator<'ctx, I> {
    /// Create an evaluator for the instantiation named by `current`
    pub fn new(
        registry: &'ctx CapabilityRegistry,
        instantiate: &'ctx mut I,
        current: Nominal,
    ) -> Evaluator<'ctx, I> {
        Evaluator {
            registry,
            instantiate,
            current,
            scope: HashMap::new(),
            produced: HashSet::new(),
            site: SpanTuple::builtin(),
        }
    }

    pub fn evaluate(mut self, ctor: &Constructor) -> Result<Ty, Error> {
        let args = self.current.args().clone();
        if ctor.params.len() != args.len() {
            return Err(Error::new(ErrKind::Arity)
                .with_msg(format!(
                    "`{}` expects {} arguments, got {}",
                    ctor.id.name(),
                    ctor.params.len(),
                    args.len()
                ))
                .with_loc(ctor.location.clone()));
        }

        log!(eval, "evaluating `{}`", self.current);

        produced_names(&ctor.body.result, &mut self.produced);

        ctor.params.iter().zip(args.iter()).for_each(|(param, arg)| {
            self.scope.insert(
                *param,
                Binding {
                    slot: Slot::Value(arg.clone()),
                    mutable: false,
                },
            );
        });

        for stmt in ctor.body.stmts.iter() {
            self.site = stmt.location.clone();
            self.stmt(&stmt.kind)
                .map_err(|e| e.or_loc(&stmt.location))?;
        }

        self.site = ctor.body.result_location.clone();
        self.result(&ctor.body.result)
            .map_err(|e| e.or_loc(&ctor.body.result_location))
    }

    fn result(&mut self, expr: &Expr) -> Result<Ty, Error> {
        let working = match expr {
            Expr::Var(name) => self.take_working(*name),
            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                return match self.boolean(cond)? {
                    true => self.result(then),
                    false => self.result(otherwise),
                }
            }
            _ => None,
        };

        let produced = match working {
            Some(builder) => Slot::Working(builder),
            None => self.eval(expr)?,
        };

        match produced {
            Slot::Working(builder) => {
                log!(eval, "freezing `{}`", self.current);
                Ok(builder.finish(Some(self.current.clone())))
            }
            Slot::Value(Value::Type(ty)) => Ok(ty),
            Slot::Value(other) => Err(mismatch("a type as the result of a constructor", &other)),
        }
    }

    fn take_working(&mut self, name: Symbol) -> Option<TypeBuilder> {
        match self.scope.remove(&name) {
            Some(Binding {
                slot: Slot::Working(builder),
                ..
            }) => Some(builder),
            Some(other) => {
                self.scope.insert(name, other);
                None
            }
            None => None,
        }
    }

    fn stmt(&mut self, stmt: &StmtKind) -> Result<(), Error> {
        match stmt {
            StmtKind::Binding {
                name,
                mutable,
                value,
            } => {
                let slot = self.eval(value)?;
                self.scope.insert(
                    *name,
                    Binding {
                        slot,
                        mutable: *mutable,
                    },
                );
            }
            StmtKind::Assign {
                place: Place::Var(name),
                value,
            } => {
                let slot = self.eval(value)?;
                let binding = self.scope.get_mut(name).ok_or_else(|| unknown(*name))?;
                if !binding.mutable {
                    return Err(immutable(*name));
                }

                binding.slot = slot;
            }
            StmtKind::Assign {
                place: Place::Member { var, member },
                value,
            } => {
                let value = self.value(value)?;
                self.assign_member(*var, *member, value)?;
            }
            StmtKind::Assert(cond) => self.assert(cond)?,
            StmtKind::Expr(e) => {
                self.eval(e)?;
            }
        }

        Ok(())
    }

    fn assign_member(&mut self, var: Symbol, member: Symbol, value: Value) -> Result<(), Error> {
        let binding = self.scope.get_mut(&var).ok_or_else(|| unknown(var))?;
        let mutable = binding.mutable;

        match &mut binding.slot {
            Slot::Value(Value::Type(ty)) => Err(Error::new(ErrKind::FrozenType).with_msg(
                format!("cannot set `{member}` on `{ty}`: the type has already been finalized"),
            )),
            Slot::Value(other) => Err(mismatch("a type under construction", other)),
            Slot::Working(_) if !mutable => Err(immutable(var)),
            Slot::Working(builder) => match value {
                Value::Function(function) => builder.attach_method(member, function),
                Value::Type(ty) => builder.set_member(member, ty),
                other => Err(mismatch("a type or a function", &other)),
            },
        }
    }

    fn assert(&mut self, cond: &Expr) -> Result<(), Error> {
        if self.boolean(cond)? {
            return Ok(());
        }

        let msg = match cond {
            Expr::HasImpl { trait_name, ty } => {
                format!("`{}` does not implement `{trait_name}`", self.ty(ty)?)
            }
            _ => String::from("assertion evaluated to false"),
        };

        Err(Error::new(ErrKind::AssertionFailed).with_msg(msg))
    }

    fn eval(&mut self, expr: &Expr) -> Result<Slot, Error> {
        match expr {
            Expr::Struct(fields) => {
                let fields = self.members(fields)?;
                Ok(Slot::Working(TypeBuilder::structure(fields)?))
            }
            Expr::Enum(variants) => {
                let variants = self.members(variants)?;
                Ok(Slot::Working(TypeBuilder::enumeration(variants)?))
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => match self.boolean(cond)? {
                true => self.eval(then),
                false => self.eval(otherwise),
            },
            // binding a working value to another name copies it
            Expr::Var(name) => match self.scope.get(name) {
                Some(Binding {
                    slot: Slot::Working(builder),
                    ..
                }) => Ok(Slot::Working(builder.clone())),
                _ => self.var(*name).map(Slot::Value),
            },
            other => self.value(other).map(Slot::Value),
        }
    }

    fn value(&mut self, expr: &Expr) -> Result<Value, Error> {
        match expr {
            Expr::Var(name) => self.var(*name),
            Expr::Const(value) => Ok(value.clone()),
            Expr::Member(base, name) => self.member(base, *name),
            Expr::Call { callee, args } => {
                let ctor = match self.value(callee)? {
                    Value::Constructor(ctor) => ctor,
                    other => return Err(mismatch("a constructor", &other)),
                };
                let args = args
                    .iter()
                    .map(|arg| self.value(arg))
                    .collect::<Result<Args, Error>>()?;

                self.instantiate
                    .instantiate(ctor, args, &self.site)
                    .map(Value::Type)
            }
            Expr::HasImpl { trait_name, ty } => {
                let ty = self.ty(ty)?;
                self.registry.query(*trait_name, &ty).map(Value::Bool)
            }
            Expr::Not(e) => Ok(Value::Bool(!self.boolean(e)?)),
            Expr::And(lhs, rhs) => Ok(Value::Bool(self.boolean(lhs)? && self.boolean(rhs)?)),
            Expr::Or(lhs, rhs) => Ok(Value::Bool(self.boolean(lhs)? || self.boolean(rhs)?)),
            Expr::Eq(lhs, rhs) => {
                let lhs = self.value(lhs)?;
                Ok(Value::Bool(lhs == self.value(rhs)?))
            }
            Expr::Tuple(elements) => elements
                .iter()
                .map(|e| self.value(e))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple),
            Expr::TupleType(elements) => Ok(Ty::tuple(self.types(elements)?).into()),
            Expr::Pointer(to) => Ok(Ty::pointer(self.ty(to)?).into()),
            Expr::Array { element, len } => {
                let element = self.ty(element)?;
                let len = match self.value(len)? {
                    Value::Int(len) if len >= 0 => len as u64,
                    other => return Err(mismatch("a non-negative integer", &other)),
                };

                Ok(Ty::array(element, len).into())
            }
            Expr::FunctionPointer { params, ret } => {
                let params = self.types(params)?;
                Ok(Ty::function_pointer(params, self.ty(ret)?).into())
            }
            Expr::Function {
                name,
                params,
                ret,
                body,
            } => Ok(Value::Function(Function {
                name: *name,
                params: self.types(params)?,
                ret: self.ty(ret)?,
                body: *body,
            })),
            Expr::Map(entries) => entries
                .iter()
                .map(|(k, v)| -> Result<(Value, Value), Error> {
                    Ok((self.value(k)?, self.value(v)?))
                })
                .collect::<Result<MapValue, Error>>()
                .map(Value::Map),
            Expr::MapGet { map, key, or_else } => {
                let map = match self.value(map)? {
                    Value::Map(map) => map,
                    other => return Err(mismatch("a map", &other)),
                };
                let key = self.value(key)?;

                match map.get(&key) {
                    Some(found) => Ok(found.clone()),
                    None => self.value(or_else),
                }
            }
            Expr::SelfType => Ok(Ty::indirect(self.current.clone()).into()),
            // anonymous types, which are finished right away
            Expr::Struct(_) | Expr::Enum(_) | Expr::If { .. } => match self.eval(expr)? {
                Slot::Value(value) => Ok(value),
                Slot::Working(builder) => Ok(builder.finish(None).into()),
            },
        }
    }

    fn var(&self, name: Symbol) -> Result<Value, Error> {
        match self.scope.get(&name) {
            Some(Binding {
                slot: Slot::Value(value),
                ..
            }) => Ok(value.clone()),
            // the produced value stands for the type being instantiated, and other
            // working values are finished as they are
            Some(Binding {
                slot: Slot::Working(builder),
                ..
            }) => match self.produced.contains(&name) {
                true => Ok(Ty::indirect(self.current.clone()).into()),
                false => Ok(builder.clone().finish(None).into()),
            },
            None => self
                .instantiate
                .lookup(name)
                .map(Value::Constructor)
                .ok_or_else(|| unknown(name)),
        }
    }

    fn member(&mut self, base: &Expr, name: Symbol) -> Result<Value, Error> {
        // read from the working value itself rather than from its indirection
        if let Expr::Var(var) = base {
            if let Some(Binding {
                slot: Slot::Working(builder),
                ..
            }) = self.scope.get(var)
            {
                return builder
                    .member(name)
                    .cloned()
                    .map(Value::Type)
                    .or_else(|| builder.method(name).cloned().map(Value::Function))
                    .ok_or_else(|| no_member(name, var));
            }
        }

        match self.value(base)? {
            Value::Type(ty) => ty
                .member(name)
                .cloned()
                .map(Value::Type)
                .or_else(|| ty.method(name).cloned().map(Value::Function))
                .ok_or_else(|| no_member(name, &ty)),
            other => Err(mismatch("a type", &other)),
        }
    }

    fn members(&mut self, members: &[(Symbol, Expr)]) -> Result<Vec<(Symbol, Ty)>, Error> {
        members
            .iter()
            .map(|(name, e)| Ok((*name, self.ty(e)?)))
            .collect()
    }

    fn types(&mut self, exprs: &[Expr]) -> Result<Vec<Ty>, Error> {
        exprs.iter().map(|e| self.ty(e)).collect()
    }

    fn ty(&mut self, expr: &Expr) -> Result<Ty, Error> {
        match self.value(expr)? {
            Value::Type(ty) => Ok(ty),
            other => Err(mismatch("a type", &other)),
        }
    }

    fn boolean(&mut self, expr: &Expr) -> Result<bool, Error> {
        match self.value(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("a boolean", &other)),
        }
    }
}

/// Names the result expression may produce, through conditionals
fn produced_names(result: &Expr, names: &mut HashSet<Symbol>) {
    match result {
        Expr::Var(name) => {
            names.insert(*name);
        }
        Expr::If {
            then, otherwise, ..
        } => {
            produced_names(then, names);
            produced_names(otherwise, names);
        }
        _ => {}
    }
}

fn immutable(name: Symbol) -> Error {
    Error::new(ErrKind::TypeMismatch)
        .with_msg(format!("cannot assign twice to immutable binding `{name}`"))
}
