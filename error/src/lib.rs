//! The error crate contains the diagnostics produced while instantiating type
//! constructors. They are used by the type value model, the capability registry, the
//! evaluator, the instantiation cache and the façade alike.
//!
//! An [`Error`] aborts the instantiation it was produced in and is never cached: asking
//! for the same instantiation again will re-run the constructor.

use std::fmt::{Display, Formatter, Result as FmtResult};

use colored::Colorize;
use location::{SourceOwned, SpanTuple};

/// The role of the error handler is to keep track of errors and emit them properly
/// once done. Errors coming from unrelated instantiations are independent: the handler
/// simply accumulates them so that the driver can keep going.
#[derive(Default, Debug)]
pub struct ErrorHandler {
    errors: Vec<Error>,
}

impl ErrorHandler {
    /// Emit all the errors contained in a handler
    pub fn emit(&self) {
        if let Some(first_err) = self.errors.first() {
            first_err.emit();
        }
        self.errors.iter().skip(1).for_each(|e| {
            eprintln!();
            e.emit()
        });
    }

    /// Add a new error to the handler
    pub fn add(&mut self, err: Error) {
        self.errors.push(err)
    }

    /// Keep the value of a result, or store its error and return [`None`]
    pub fn keep<T>(&mut self, res: Result<T, Error>) -> Option<T> {
        match res {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(e);
                None
            }
        }
    }

    /// Has the error handler seen errors or not
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Turn the handler into a single error, if it contains any
    pub fn finish(mut self) -> Result<(), Error> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(Error::new(ErrKind::Multiple(self.errors))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrKind {
    Hint,
    /// An `assert` in a constructor body evaluated to false
    AssertionFailed,
    /// Wrong amount of arguments given to a constructor
    Arity,
    /// Struct or enum definition with repeated member names
    DuplicateMember,
    /// Mutation of a type which has already been finalized
    FrozenType,
    /// A capability derivation rule closing a cycle
    CapabilityCycle,
    /// A constructor re-entering itself with the exact same arguments
    CyclicInstantiation,
    /// A capability query on a trait nobody ever declared
    UndefinedCapability,
    /// Unbound variable or constructor
    UnknownName,
    /// An expression evaluated to the wrong kind of compile-time value
    TypeMismatch,
    Multiple(Vec<Error>),
}

impl ErrKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrKind::Hint => "hint",
            ErrKind::AssertionFailed => "assertion failed",
            ErrKind::Arity => "arity",
            ErrKind::DuplicateMember => "duplicate member",
            ErrKind::FrozenType => "frozen type",
            ErrKind::CapabilityCycle => "capability cycle",
            ErrKind::CyclicInstantiation => "cyclic instantiation",
            ErrKind::UndefinedCapability => "undefined capability",
            ErrKind::UnknownName => "unknown name",
            ErrKind::TypeMismatch => "type mismatch",
            ErrKind::Multiple(_) => "multiple errors",
        }
    }
}

/// The instantiation an error happened in: which constructor, with which arguments.
/// Both are kept rendered, since the error must outlive the compilation context.
/// Constructors sharing a name are told apart by their `origin`, the declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiation {
    pub ctor: String,
    pub origin: u64,
    pub args: String,
}

impl Display for Instantiation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}({})", self.ctor, self.args)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrKind,
    msg: Option<String>,
    loc: Option<SpanTuple>,
    instantiation: Option<Instantiation>,
    hints: Vec<Error>,
}

fn get_path_str(loc: &SpanTuple) -> String {
    match loc.source() {
        SourceOwned::Path(p) => format!("{}", p.display()),
        SourceOwned::Input(_) => String::from("<source>"),
        SourceOwned::Empty => String::from("<builtin>"),
    }
}

impl Error {
    pub fn new(kind: ErrKind) -> Error {
        Error {
            kind,
            msg: None,
            loc: None,
            instantiation: None,
            hints: vec![],
        }
    }

    pub fn hint() -> Error {
        Error::new(ErrKind::Hint)
    }

    pub fn with_msg(self, msg: String) -> Error {
        Error {
            msg: Some(msg),
            ..self
        }
    }

    pub fn with_loc(self, loc: SpanTuple) -> Error {
        Error {
            loc: Some(loc),
            ..self
        }
    }

    /// Attach a location, unless a more precise one is already present. Errors are
    /// located where they are created when possible, and by their enclosing statement
    /// otherwise.
    pub fn or_loc(self, loc: &SpanTuple) -> Error {
        match self.loc {
            Some(_) => self,
            None => self.with_loc(loc.clone()),
        }
    }

    /// Attach the constructor and arguments being instantiated, unless the error already
    /// knows about a more deeply nested instantiation.
    pub fn or_instantiation(self, ctor: impl Display, origin: u64, args: impl Display) -> Error {
        match self.instantiation {
            Some(_) => self,
            None => Error {
                instantiation: Some(Instantiation {
                    ctor: ctor.to_string(),
                    origin,
                    args: args.to_string(),
                }),
                ..self
            },
        }
    }

    // Add a hint to emit alongside the error
    pub fn with_hint(self, hint: Error) -> Error {
        let mut new_hints = self.hints;
        new_hints.push(hint);

        Error {
            hints: new_hints,
            ..self
        }
    }

    pub fn kind(&self) -> &ErrKind {
        &self.kind
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn loc(&self) -> Option<&SpanTuple> {
        self.loc.as_ref()
    }

    pub fn instantiation(&self) -> Option<&Instantiation> {
        self.instantiation.as_ref()
    }

    pub fn hints(&self) -> &[Error] {
        &self.hints
    }

    fn emit_full_loc(&self, loc: &SpanTuple) {
        let (before_ctx, after_ctx) = loc.generate_context();

        if let Some(ctx) = before_ctx {
            ctx.emit('|', '_')
        };
        loc.emit(">".red().bold(), "^".purple());
        after_ctx.emit('|', '_');
    }

    fn emit_hint(&self) {
        eprintln!();
        eprint!("{}: ", "hint".black().on_green());
        if let Some(loc) = &self.loc {
            eprint!(
                "{}:{}:{}: ",
                get_path_str(loc).green(),
                loc.start().line(),
                loc.start().column()
            );
        }
        if let Some(msg) = &self.msg {
            eprintln!("{msg}");
        }

        if let Some(loc) = &self.loc {
            loc.emit("|".green(), "^".green());
        }
    }

    pub fn emit(&self) {
        if let ErrKind::Multiple(errs) = &self.kind {
            errs.iter().for_each(Error::emit);
            return;
        }

        eprint!(
            "{} [{}]: ",
            "error".black().on_yellow(),
            self.kind.as_str().yellow()
        );
        if let Some(loc) = &self.loc {
            eprint!(
                "{}:{}:{}: ",
                get_path_str(loc).yellow(),
                loc.start().line(),
                loc.start().column()
            );
        }
        eprintln!("{}", self.msg.as_deref().unwrap_or_default());

        if let Some(inst) = &self.instantiation {
            eprintln!(
                "  {} `{}` (constructor #{})",
                "while instantiating".bold(),
                inst,
                inst.origin
            );
        }

        if let Some(loc) = &self.loc {
            eprintln!();
            self.emit_full_loc(loc);
        }

        self.hints.iter().for_each(Error::emit_hint);
    }

    pub fn exit(&self) -> ! {
        // The exit code depends on the kind of error
        let code = match self.kind {
            ErrKind::Hint => 0,
            ErrKind::AssertionFailed => 1,
            ErrKind::Arity => 2,
            ErrKind::DuplicateMember => 3,
            ErrKind::FrozenType => 4,
            ErrKind::CapabilityCycle => 5,
            ErrKind::CyclicInstantiation => 6,
            ErrKind::UndefinedCapability => 7,
            ErrKind::UnknownName => 8,
            ErrKind::TypeMismatch => 9,
            ErrKind::Multiple(_) => 10,
        };

        std::process::exit(code + 1);
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.kind.as_str())?;
        if let Some(msg) = &self.msg {
            write!(f, ": {msg}")?;
        }
        if let Some(inst) = &self.instantiation {
            write!(f, " (while instantiating `{inst}`, constructor #{})", inst.origin)?;
        }
        if let Some(loc) = &self.loc {
            write!(f, " at {loc}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
