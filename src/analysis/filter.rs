use crate::analysis::token::Token;

pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;

    fn name(&self) -> &str;

    /// Whether the filter rewrites token text (part of term normalization)
    /// rather than removing tokens.
    fn is_normalizing(&self) -> bool {
        true
    }
}
