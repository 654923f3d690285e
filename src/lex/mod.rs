//! Lexical layer: character classes, the token set, the per-file
//! scanner, and procedure boundary detection on top of it.

pub mod chars;
mod finder;
mod scanner;
mod token;

pub use finder::{ProcStart, find_proc_end, find_proc_start};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
