//! Logging facilities, switched off by default. Every crate taking part in an
//! instantiation logs through the [`log!`] macro, tagging its messages with the
//! component they come from.

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};

// re-exported so that users of `log!` do not need to depend on `colored` themselves
#[doc(hidden)]
pub use colored;

lazy_static! {
    static ref ENABLED: AtomicBool = AtomicBool::new(false);
}

pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable() {
    ENABLED.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! log {
    (cache, $($token:tt)*) => (
        if $crate::is_enabled() {
            use $crate::colored::Colorize;

            eprintln!("<{}> [{}] {}", "LOG".black().on_purple(), "cache".black().on_green(), format_args!($($token)*));
        }
    );
    (capability, $($token:tt)*) => (
        if $crate::is_enabled() {
            use $crate::colored::Colorize;

            eprintln!("<{}> [{}] {}", "LOG".black().on_purple(), "capability".black().on_cyan(), format_args!($($token)*));
        }
    );
    (eval, $($token:tt)*) => (
        if $crate::is_enabled() {
            use $crate::colored::Colorize;

            eprintln!("<{}> [{}] {}", "LOG".black().on_purple(), "eval".black().on_yellow(), format_args!($($token)*));
        }
    );
    (generics, $($token:tt)*) => (
        if $crate::is_enabled() {
            use $crate::colored::Colorize;

            eprintln!("<{}> [{}] {}", "LOG".black().on_purple(), "generics".black().on_blue(), format_args!($($token)*));
        }
    );
    ($($token:tt)*) => (
        if $crate::is_enabled() {
            use $crate::colored::Colorize;

            eprintln!("<{}> {}", "LOG".black().on_purple(), format_args!($($token)*));
        }
    );
}
