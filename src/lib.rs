//! Inline-markup tokenizer and line classification for `routine-report`.
//!
//! Generated report text is a sequence of lines carrying three inline marker
//! forms: `**bold**`, `*italic*` and `_underline_`. This crate turns one line
//! into an ordered sequence of [`StyledRun`]s and classifies whole lines so
//! every renderer agrees on sizing and color.
//!
//! ```
//! use routine_report::{classify_line, tokenize, LineClass, StyleFlags};
//!
//! let runs = tokenize("**Cleanse** gently");
//! assert_eq!(runs[0].text, "Cleanse");
//! assert_eq!(runs[0].style, StyleFlags::BOLD);
//! assert_eq!(classify_line("1. **Morning Routine**"), LineClass::SectionHeader);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

extern crate alloc;

mod classify;
mod markup;

pub use classify::{classify_line, is_section_header, LineClass};
pub use markup::{tokenize, MarkupScanner, RunList, StyleFlags, StyleKind, StyledRun};
