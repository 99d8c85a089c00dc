use std::collections::HashMap;
use std::path::Path;

use rowan::TextRange;

use crate::source::SourceId;
use crate::symbols::DeclKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

#[derive(Debug, Clone)]
pub struct MemberSymbol {
    pub name: String,
    pub kind: MemberKind,
    pub name_range: TextRange,
    /// Declared type for fields, return type for methods; base name as
    /// written, `None` for constructors and primitive `void`.
    pub type_name: Option<String>,
    pub param_count: usize,
}

#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub simple_name: String,
    pub qualified_name: String,
    /// Empty string for the default package.
    pub package: String,
    pub origin: SourceId,
    pub kind: DeclKind,
    pub name_range: TextRange,
    pub span: TextRange,
    pub superclass: Option<String>,
    /// Declaration order.
    pub members: Vec<MemberSymbol>,
}

impl ClassSymbol {
    pub fn fields(&self) -> impl Iterator<Item = &MemberSymbol> {
        self.members
            .iter()
            .filter(|member| member.kind == MemberKind::Field)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MemberSymbol> {
        self.members
            .iter()
            .filter(|member| member.kind == MemberKind::Method)
    }

    /// Every member with this name, overloads included, declaration order.
    pub fn members_named(
        &self,
        name: &str,
    ) -> Vec<&MemberSymbol> {
        self.members
            .iter()
            .filter(|member| member.kind != MemberKind::Constructor && member.name == name)
            .collect()
    }
}

/// All classes the session currently knows, keyed by qualified name.
///
/// At most one symbol per qualified name can exist; re-entering a file
/// replaces its classes only after an invalidation purged the old rows.
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: HashMap<String, ClassSymbol>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        symbol: ClassSymbol,
    ) -> Option<ClassSymbol> {
        self.classes.insert(symbol.qualified_name.clone(), symbol)
    }

    pub fn get(
        &self,
        qualified: &str,
    ) -> Option<&ClassSymbol> {
        self.classes.get(qualified)
    }

    pub fn by_simple_name(
        &self,
        name: &str,
    ) -> Vec<&ClassSymbol> {
        let mut found: Vec<&ClassSymbol> = self
            .classes
            .values()
            .filter(|symbol| symbol.simple_name == name)
            .collect();
        found.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        found
    }

    pub fn in_package(
        &self,
        package: &str,
    ) -> Vec<&ClassSymbol> {
        let mut found: Vec<&ClassSymbol> = self
            .classes
            .values()
            .filter(|symbol| symbol.package == package)
            .collect();
        found.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        found
    }

    /// Remove every class either origin at `path` contributed.
    pub fn purge_path(
        &mut self,
        path: &Path,
    ) {
        self.classes
            .retain(|_, symbol| symbol.origin.path() != path);
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A class and its superclass chain, nearest first.
///
/// Super types resolve against the table only: same package first, then
/// any class with the written simple name. An unknown super ends the
/// chain, and a cycle cap keeps hostile inputs finite.
pub fn chain_classes<'t>(
    table: &'t ClassTable,
    qualified: &str,
) -> Vec<&'t ClassSymbol> {
    let mut chain: Vec<&ClassSymbol> = Vec::new();
    let mut current = qualified.to_string();
    for _ in 0..16 {
        let Some(class) = table.get(&current) else {
            break;
        };
        if chain
            .iter()
            .any(|seen| seen.qualified_name == class.qualified_name)
        {
            break;
        }
        chain.push(class);
        let Some(base) = class.superclass.clone() else {
            break;
        };
        current = if base.contains('.') {
            base
        } else if !class.package.is_empty()
            && table.get(&format!("{}.{}", class.package, base)).is_some()
        {
            format!("{}.{}", class.package, base)
        } else if let Some(first) = table.by_simple_name(&base).first() {
            first.qualified_name.clone()
        } else {
            break;
        };
    }
    chain
}

/// Where a resolved reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub target: SourceId,
    pub name_range: TextRange,
}

/// Reference token ranges in one analyzed file mapped to their targets,
/// plus the static type derived for expression nodes along the way.
/// A name with several method overloads maps to all of them.
#[derive(Debug, Default)]
pub struct ResolutionMap {
    entries: HashMap<TextRange, Vec<SymbolRef>>,
    types: HashMap<TextRange, String>,
}

impl ResolutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        range: TextRange,
        targets: Vec<SymbolRef>,
    ) {
        if !targets.is_empty() {
            self.entries.insert(range, targets);
        }
    }

    pub fn get(
        &self,
        range: TextRange,
    ) -> Option<&[SymbolRef]> {
        self.entries.get(&range).map(Vec::as_slice)
    }

    pub fn record_type(
        &mut self,
        range: TextRange,
        qualified: String,
    ) {
        self.types.insert(range, qualified);
    }

    /// Qualified class name of the expression covering `range`, when the
    /// resolver derived one.
    pub fn type_at(
        &self,
        range: TextRange,
    ) -> Option<&str> {
        self.types.get(&range).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
