mod index;
mod types;

pub use index::SymbolIndex;
pub use types::{DeclKind, SymbolEntry};
