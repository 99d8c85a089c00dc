//! The analysis session: one serialized pipeline over cached units.
//!
//! Submitting a text for a file identity invalidates everything the
//! session previously held for that path, then runs parse, enter,
//! attribute and flow. At most one compiled unit exists per identity.
//! Resolution can pull further files in from the source roots; they join
//! the pipeline queue and are analyzed in the same run.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rowan::{TextRange, TextSize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::diagnostics::RunLog;
use crate::protocol::{FileDiagnostics, Severity};
use crate::sema::attr::{Attributor, TypeLoader};
use crate::sema::{enter, error_at, flow};
use crate::sema::symbol::{ClassTable, ResolutionMap};
use crate::source::SourceId;
use crate::symbols::{SymbolEntry, SymbolIndex};
use crate::syntax::SyntaxTree;
use crate::syntax::cst_parser::ParseError;
use crate::text_pos::LineIndex;

/// Pipeline stages a hook can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Enter,
    Analyze,
}

/// What a hook sees when its phase fires for one unit.
pub struct UnitView<'a> {
    pub source: &'a SourceId,
    pub tree: &'a SyntaxTree,
    pub line_index: &'a LineIndex,
    /// Populated at [`Phase::Analyze`] only.
    pub resolutions: Option<&'a ResolutionMap>,
    pub table: &'a ClassTable,
    pub symbols: &'a SymbolIndex,
}

/// Tree observer invoked as pipeline phases finish. Hooks accumulate
/// their findings internally; the registry is replaced wholesale for
/// every request.
pub trait PhaseHook: Send {
    fn phase(&self) -> Phase;

    fn visit(
        &mut self,
        unit: &UnitView<'_>,
    );
}

/// One analyzed text the session keeps until the path is invalidated.
pub struct CompiledUnit {
    pub tree: SyntaxTree,
    pub line_index: LineIndex,
    pub resolutions: ResolutionMap,
}

pub struct AnalysisSession {
    config: Arc<AnalyzerConfig>,
    units: HashMap<SourceId, CompiledUnit>,
    table: ClassTable,
    symbols: SymbolIndex,
    log: RunLog,
    todo: VecDeque<SourceId>,
    hooks: Vec<Box<dyn PhaseHook>>,
    load_attempts: HashSet<String>,
}

impl AnalysisSession {
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        Self {
            config,
            units: HashMap::new(),
            table: ClassTable::new(),
            symbols: SymbolIndex::new(),
            log: RunLog::new(),
            todo: VecDeque::new(),
            hooks: Vec::new(),
            load_attempts: HashSet::new(),
        }
    }

    pub fn unit(
        &self,
        source: &SourceId,
    ) -> Option<&CompiledUnit> {
        self.units.get(source)
    }

    pub fn class_table(&self) -> &ClassTable {
        &self.table
    }

    pub fn symbol_index(&self) -> &SymbolIndex {
        &self.symbols
    }

    pub fn nerrors(&self) -> u32 {
        self.log.nerrors
    }

    /// Replace the hook registry for the next run.
    pub fn set_hooks(
        &mut self,
        hooks: Vec<Box<dyn PhaseHook>>,
    ) {
        self.hooks = hooks;
    }

    /// Start collecting diagnostics for a request.
    pub fn begin_request(&mut self) {
        self.log.install_collector();
    }

    /// Finish the request: drop the hooks and hand back the grouped
    /// diagnostics collected since [`begin_request`](Self::begin_request).
    pub fn finish_request(&mut self) -> Vec<FileDiagnostics> {
        self.hooks.clear();
        self.log
            .take_collector()
            .map(|collector| collector.finalize())
            .unwrap_or_default()
    }

    /// Throw away any half-finished run. Used after a request panicked
    /// somewhere inside the pipeline.
    pub fn reset_run_state(&mut self) {
        self.todo.clear();
        self.hooks.clear();
        self.load_attempts.clear();
        self.log.reset_counts();
        self.log.take_collector();
    }

    /// Drop every trace of `path`: both origin units, their classes, and
    /// their index rows. Error counters restart from zero.
    pub fn invalidate_path(
        &mut self,
        path: &Path,
    ) {
        let removed: Vec<SourceId> = self
            .units
            .keys()
            .filter(|id| id.path() == path)
            .cloned()
            .collect();
        for id in &removed {
            self.units.remove(id);
        }
        self.table.purge_path(path);
        let generation = self.symbols.purge_path(path);
        self.log.reset_counts();
        debug!(
            path = %path.display(),
            units = removed.len(),
            generation,
            "invalidated",
        );
    }

    /// Run the full pipeline over a submitted text.
    pub fn submit_and_analyze(
        &mut self,
        source: SourceId,
        text: Arc<str>,
    ) {
        info!(%source, bytes = text.len(), "analyzing");
        let path = source.path().to_path_buf();
        self.invalidate_path(&path);
        self.load_attempts.clear();

        let (tree, parse_errors) = SyntaxTree::parse(text.clone());
        let line_index = LineIndex::new(text);
        self.report_parse_errors(&source, &line_index, &parse_errors);
        self.run_hooks_with(Phase::Parse, &source, &tree, &line_index, None);

        let entered = enter::enter_trees(
            &source,
            &tree,
            &line_index,
            &mut self.table,
            &mut self.log,
        );
        debug!(%source, classes = entered.len(), "entered");
        self.run_hooks_with(Phase::Enter, &source, &tree, &line_index, None);

        self.units.insert(
            source.clone(),
            CompiledUnit {
                tree,
                line_index,
                resolutions: ResolutionMap::new(),
            },
        );
        self.todo.push_back(source);

        while let Some(current) = self.todo.pop_front() {
            self.analyze_one(&current);
        }
    }

    fn report_parse_errors(
        &mut self,
        source: &SourceId,
        line_index: &LineIndex,
        errors: &[ParseError],
    ) {
        for error in errors {
            let range = TextRange::new(
                TextSize::from(error.start as u32),
                TextSize::from(error.end as u32),
            );
            self.log.report(error_at(
                source,
                line_index,
                range,
                error.message.clone(),
                Severity::Error,
            ));
        }
    }

    /// Attribute, then flow, then publish to the symbol index; hooks see
    /// the finished unit last. Flow only runs on error-free state.
    fn analyze_one(
        &mut self,
        source: &SourceId,
    ) {
        let Some(mut unit) = self.units.remove(source) else {
            return;
        };
        let mut loader = SessionLoader {
            config: self.config.as_ref(),
            units: &mut self.units,
            todo: &mut self.todo,
            attempts: &mut self.load_attempts,
        };
        let attributor = Attributor::new(
            source,
            &unit.line_index,
            &mut self.table,
            &self.symbols,
            &mut loader,
            &mut self.log,
        );
        unit.resolutions = attributor.attribute(&unit.tree);

        if self.log.nerrors > 0 {
            debug!(%source, nerrors = self.log.nerrors, "skipping flow");
        } else {
            flow::analyze_unit(source, &unit.tree, &unit.line_index, &mut self.log);
        }

        self.units.insert(source.clone(), unit);
        self.index_unit(source);

        let Some(unit) = self.units.get(source) else {
            return;
        };
        let view = UnitView {
            source,
            tree: &unit.tree,
            line_index: &unit.line_index,
            resolutions: Some(&unit.resolutions),
            table: &self.table,
            symbols: &self.symbols,
        };
        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in hooks.iter_mut() {
            if hook.phase() == Phase::Analyze {
                hook.visit(&view);
            }
        }
        self.hooks = hooks;
    }

    fn run_hooks_with(
        &mut self,
        phase: Phase,
        source: &SourceId,
        tree: &SyntaxTree,
        line_index: &LineIndex,
        resolutions: Option<&ResolutionMap>,
    ) {
        let mut hooks = std::mem::take(&mut self.hooks);
        {
            let view = UnitView {
                source,
                tree,
                line_index,
                resolutions,
                table: &self.table,
                symbols: &self.symbols,
            };
            for hook in hooks.iter_mut() {
                if hook.phase() == phase {
                    hook.visit(&view);
                }
            }
        }
        self.hooks = hooks;
    }

    /// Publish the unit's classes to the durable index under the path's
    /// current generation.
    fn index_unit(
        &mut self,
        source: &SourceId,
    ) {
        let generation = self.symbols.generation(source.path());
        for class in self.table.classes() {
            if class.origin != *source {
                continue;
            }
            self.symbols.insert(SymbolEntry {
                owner: source.clone(),
                name: class.simple_name.clone(),
                qualified_name: class.qualified_name.clone(),
                name_range: class.name_range,
                kind: class.kind,
                generation,
            });
        }
    }
}

/// Pulls referenced types in from the configured roots. A simple name
/// `Foo` matches the first `Foo.java` found walking the roots in order;
/// the file is parsed and entered and joins the pipeline queue.
struct SessionLoader<'s> {
    config: &'s AnalyzerConfig,
    units: &'s mut HashMap<SourceId, CompiledUnit>,
    todo: &'s mut VecDeque<SourceId>,
    attempts: &'s mut HashSet<String>,
}

impl SessionLoader<'_> {
    fn find_file(
        &self,
        name: &str,
    ) -> Option<PathBuf> {
        let file_name = format!("{name}.java");
        for root in self.config.lookup_roots() {
            for entry in WalkDir::new(&root).into_iter().flatten() {
                if entry.file_type().is_file()
                    && entry.file_name().to_str() == Some(file_name.as_str())
                {
                    return Some(entry.path().to_path_buf());
                }
            }
        }
        None
    }
}

impl TypeLoader for SessionLoader<'_> {
    fn load_type(
        &mut self,
        name: &str,
        table: &mut ClassTable,
        log: &mut RunLog,
    ) -> bool {
        if !self.attempts.insert(name.to_string()) {
            return false;
        }
        let Some(path) = self.find_file(name) else {
            return false;
        };
        if self.units.keys().any(|id| id.path() == path) {
            // Already analyzed; the name simply is not declared there.
            return false;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => Arc::<str>::from(text),
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot load source");
                return false;
            },
        };
        let source = SourceId::Disk(path);
        info!(%source, "loading referenced source");
        let (tree, parse_errors) = SyntaxTree::parse(text.clone());
        let line_index = LineIndex::new(text);
        for error in &parse_errors {
            let range = TextRange::new(
                TextSize::from(error.start as u32),
                TextSize::from(error.end as u32),
            );
            log.report(error_at(
                &source,
                &line_index,
                range,
                error.message.clone(),
                Severity::Error,
            ));
        }
        enter::enter_trees(&source, &tree, &line_index, table, log);
        self.units.insert(
            source.clone(),
            CompiledUnit {
                tree,
                line_index,
                resolutions: ResolutionMap::new(),
            },
        );
        self.todo.push_back(source);
        true
    }
}

#[cfg(test)]
#[path = "../tests/src/session_unit_tests.rs"]
mod tests;
