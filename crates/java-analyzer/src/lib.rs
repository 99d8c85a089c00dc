pub mod completion;
pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod protocol;
pub mod sema;
pub mod server;
pub mod session;
pub mod source;
pub mod symbols;
pub mod syntax;
pub mod text_pos;

pub use completion::CompletionVisitor;
pub use config::AnalyzerConfig;
pub use definition::DefinitionVisitor;
pub use server::RequestHandler;
pub use session::{AnalysisSession, Phase, PhaseHook, UnitView};
pub use source::SourceId;
pub use symbols::SymbolIndex;
pub use text_pos::LineIndex;
