pub mod directive;
pub mod intent;
pub mod lex;
