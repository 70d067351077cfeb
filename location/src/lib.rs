//! The location module contains helpful types regarding the location of constructor
//! source code. The information is created by the front end during parsing, and
//! kept in every statement of a constructor body so that failed instantiations can
//! point at the statement which aborted them.
//! Statements keep *two* instances of a [`Location`] struct: A start one, and an end
//! one, which indicates the range of the statement. Since such a construct is needed
//! in multiple places, a wrapper type containing a start and end [`Location`] exists:
//! [`SpanTuple`].

use std::cmp::max;
use std::fmt::Display;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Debug, Eq, PartialEq, Clone)]
enum Column {
    EndOfLine,
    Precise(NonZeroUsize),
}

/// Base type for the location of a statement, generated during the parsing phase.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Location {
    line: NonZeroUsize,
    column: Column,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Location {
        Location {
            // If we ever create a location with zero as a line or column, panic
            line: NonZeroUsize::new(line).unwrap(),
            column: Column::Precise(NonZeroUsize::new(column).unwrap()),
        }
    }

    pub fn whole_line(line: usize) -> Location {
        Location {
            // If we ever create a location with zero as a line, panic
            line: NonZeroUsize::new(line).unwrap(),
            column: Column::EndOfLine,
        }
    }

    pub fn line(&self) -> usize {
        self.line.get()
    }

    pub fn column(&self) -> usize {
        match self.column {
            Column::Precise(nz) => nz.get(),
            // When accessing a location which represents a whole line, we can
            // simply say that it starts at the first character: Thus, return 1
            Column::EndOfLine => 1usize,
        }
    }
}

/// Where the code of a constructor comes from: a file, a string input, or nowhere at all
/// for builtin constructors, tests and mocking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOwned {
    Path(PathBuf),
    Input(String),
    Empty,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpanTuple {
    source: SourceOwned,
    start: Location,
    end: Location,
}

impl SpanTuple {
    /// Location used for everything the toolchain declares itself, such as the prelude's
    /// constructors. There is no text to point at, so emitting it prints nothing.
    pub fn builtin() -> SpanTuple {
        SpanTuple::with_source(
            SourceOwned::Empty,
            Location::new(1, 1),
            Location::new(1, 1),
        )
    }

    pub fn is_builtin(&self) -> bool {
        self.source == SourceOwned::Empty
    }

    pub fn with_source(source: SourceOwned, start: Location, end: Location) -> SpanTuple {
        SpanTuple { source, start, end }
    }

    pub fn start(&self) -> &Location {
        &self.start
    }

    pub fn end(&self) -> &Location {
        &self.end
    }

    pub fn source(&self) -> &SourceOwned {
        &self.source
    }

    /// Amount of lines to use when creating before and after context for a
    /// [`SpanTuple`]
    const CONTEXT_LINES: usize = 3;

    /// Create a span context from a given range of text. This returns two new
    /// [`SpanTuple`]s, which wrap around the original one in order to add context.
    /// The before context is created by substracting the line number, if possible,
    /// and the after context by adding to the line number.
    /// You can then display both of these [`SpanTuple`]s as you would normally.
    /// Since the before context depends on whether or not enough lines are
    /// available before `self`, it will sometimes not be possible to create
    /// one. An after context is always given, as checking whether or not there
    /// are enough lines in the input is a very costly operation and unecessary:
    /// if there aren't enough lines, they will all be skipped during the emission
    /// and nothing will be printed.
    pub fn generate_context(&self) -> (Option<SpanTuple>, SpanTuple) {
        let before_ctx = if self.start().line() > SpanTuple::CONTEXT_LINES + 1 {
            let before_start =
                Location::whole_line(max(self.start().line() - SpanTuple::CONTEXT_LINES, 1));
            let before_end = Location::whole_line(self.start().line() - 1);
            Some(SpanTuple::with_source(
                self.source().clone(),
                before_start,
                before_end,
            ))
        } else {
            None
        };

        let after_start = Location::whole_line(self.end().line() + 1);
        let after_end = Location::whole_line(self.end().line() + SpanTuple::CONTEXT_LINES);
        let after_ctx = SpanTuple::with_source(self.source().clone(), after_start, after_end);

        (before_ctx, after_ctx)
    }

    /// Print the lines covered by the [`SpanTuple`] on stderr, prefixed with their line
    /// number and `separator`. Single-line spans are underlined using `repetitor`.
    /// Spans without any text to show (builtins, reversed spans, context past the end
    /// of the input) print nothing.
    pub fn emit<T1: Display, T2: Display>(&self, separator: T1, repetitor: T2) {
        let rendered = self.render(&separator, &repetitor);

        if !rendered.is_empty() {
            eprintln!("{rendered}")
        }
    }

    fn render<T1: Display, T2: Display>(&self, separator: &T1, repetitor: &T2) -> String {
        match self.source() {
            // If the file has been removed between parsing and emitting errors, there is
            // nothing left to point at
            SourceOwned::Path(path) => fs::read_to_string(path)
                .map(|input| self.render_input(separator, repetitor, &input))
                .unwrap_or_default(),
            SourceOwned::Input(input) => self.render_input(separator, repetitor, input),
            SourceOwned::Empty => String::new(),
        }
    }

    fn render_input<T1: Display, T2: Display>(
        &self,
        separator: &T1,
        repetitor: &T2,
        input: &str,
    ) -> String {
        let (first, last) = (self.start.line(), self.end.line());

        if first > last || (first == last && self.start.column() > self.end.column()) {
            return String::new();
        }

        let end_col = |line: &str| match self.end.column {
            Column::EndOfLine => line.len(),
            Column::Precise(nz) => nz.get(),
        };

        let mut rendered = Vec::new();
        for (number, line) in input
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .skip(first - 1)
            .take(last - first + 1)
        {
            if first == last {
                rendered.push(format!("{number:5} {separator} {line}"));

                // keep tabs and spaces so the underline lines up with the code
                let mut underline: String = line
                    .chars()
                    .take(self.start.column() - 1)
                    .map(|c| if c.is_whitespace() { c } else { ' ' })
                    .collect();
                (self.start.column()..end_col(line))
                    .for_each(|_| underline.push_str(&repetitor.to_string()));

                rendered.push(format!("      {} {underline}", ' '));
            } else if number == last {
                let clipped = line.get(..end_col(line)).unwrap_or(line);
                rendered.push(format!("{number:5} {separator} {clipped}"));
            } else {
                rendered.push(format!("{number:5} {separator} {line}"));
            }
        }

        rendered.join("\n")
    }
}

impl Display for SpanTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = match &self.source {
            SourceOwned::Path(p) => format!("{}", p.display()),
            SourceOwned::Input(_) => String::from("<source>"),
            SourceOwned::Empty => String::from("<builtin>"),
        };

        write!(f, "{}:{}:{}", path, self.start.line(), self.start.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"hashmap(key: type, value: type) {
    assert(has_impl(totalord, key));
    mut kind = struct { keys: *key, values: *value };
    kind.new = fun() -> kind;
    kind
}"#;

    #[test]
    fn span_same_line() {
        let s = Location::new(2, 5);
        let e = Location::new(2, 11);
        let span = SpanTuple::with_source(SourceOwned::Input(String::from(BODY)), s, e);

        assert_eq!(
            span.render(&'>', &'-'),
            r#"    2 >     assert(has_impl(totalord, key));
            ------"#
        );
    }

    #[test]
    fn multi_line_span() {
        let s = Location::new(2, 1);
        let e = Location::new(3, 53);
        let span = SpanTuple::with_source(SourceOwned::Input(String::from(BODY)), s, e);

        assert_eq!(
            span.render(&'>', &'_'),
            r#"    2 >     assert(has_impl(totalord, key));
    3 >     mut kind = struct { keys: *key, values: *value };"#
        );
    }

    #[test]
    fn span_reversed_prints_nothing() {
        let s = Location::new(4, 1);
        let e = Location::new(1, 1);
        let span = SpanTuple::with_source(SourceOwned::Input(String::from(BODY)), s, e);

        assert!(span.render(&' ', &' ').is_empty());
    }

    #[test]
    fn builtin_span_is_silent() {
        let span = SpanTuple::builtin();

        assert!(span.is_builtin());
        assert!(span.render(&'>', &'^').is_empty());
        assert_eq!(span.to_string(), "<builtin>:1:1");
    }

    #[test]
    #[should_panic]
    fn zero_line() {
        Location::new(0, 15);
    }

    #[test]
    #[should_panic]
    fn zero_col() {
        Location::new(10, 0);
    }

    #[test]
    #[should_panic]
    fn zero_line_col() {
        Location::new(0, 0);
    }

    #[test]
    fn span_from_input() {
        let s = Location::new(1, 3);
        let e = Location::new(1, 6);
        let span = SpanTuple::with_source(SourceOwned::Input(String::from("mut kind = unit;")), s, e);

        assert_eq!(
            span.render(&'>', &'-'),
            r#"    1 > mut kind = unit;
          ---"#
        );
    }

    #[test]
    fn context_around_deep_span() {
        let span = SpanTuple::with_source(
            SourceOwned::Input(String::from(BODY)),
            Location::new(5, 5),
            Location::new(5, 9),
        );
        let (before, after) = span.generate_context();
        let before = before.unwrap();

        assert_eq!(before.start().line(), 2);
        assert_eq!(before.end().line(), 4);
        assert_eq!(after.start().line(), 6);
        assert_eq!(after.render(&'|', &'_'), "    6 | }");
    }
}
