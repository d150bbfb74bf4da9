//! Text handling: stopwords and tokenization

mod stopwords;
mod tokenize;

pub use stopwords::{fetch_supplementary, load_stopwords, StopWords};
pub use tokenize::tokenize;
