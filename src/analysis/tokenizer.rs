use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits on Unicode word boundaries, then on every character that is not
/// alphanumeric or `_`, so dotted paths like `pkg.Class` become two tokens
/// while identifiers like `crop_factor` stay whole.
#[derive(Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl StandardTokenizer {
    pub fn new(max_token_length: usize) -> Self {
        StandardTokenizer { max_token_length }
    }

    fn is_term_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (word_offset, word) in text.unicode_word_indices() {
            let mut start: Option<usize> = None;

            // Trailing sentinel flushes the last piece
            let chars = word.char_indices().chain(std::iter::once((word.len(), ' ')));
            for (idx, c) in chars {
                match (start, Self::is_term_char(c)) {
                    (None, true) => start = Some(idx),
                    (Some(from), false) => {
                        let piece = &word[from..idx];
                        if piece.len() <= self.max_token_length {
                            tokens.push(Token::new(piece.to_string(), position, word_offset + from));
                            position += 1;
                        }
                        start = None;
                    }
                    _ => {}
                }
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}
