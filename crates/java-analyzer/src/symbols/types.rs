use rowan::TextRange;

use crate::source::SourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
}

/// One indexed type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub owner: SourceId,
    pub name: String,
    pub qualified_name: String,
    pub name_range: TextRange,
    pub kind: DeclKind,
    pub generation: u64,
}
