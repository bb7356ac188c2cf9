//! Generic XML element tree and the tokenizer/writer glue around `quick-xml`

pub mod model;
pub mod parser;
pub mod writer;

pub use model::{Content, Document, Element};
pub use parser::{Config as ReadConfig, Parser};
pub use writer::{render, Config as WriteConfig};
