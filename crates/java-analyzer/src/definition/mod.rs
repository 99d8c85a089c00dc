mod provider;

pub use provider::DefinitionVisitor;

#[cfg(test)]
#[path = "../../tests/src/definition_tests.rs"]
mod tests;
