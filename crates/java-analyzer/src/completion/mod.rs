pub(crate) mod context;
mod provider;

pub use provider::CompletionVisitor;

#[cfg(test)]
#[path = "../../tests/src/completion_tests.rs"]
mod tests;
