pub mod analyzer;
pub mod matcher;
pub mod scorer;
pub mod segments;

pub use analyzer::*;
pub use matcher::*;
pub use scorer::*;
pub use segments::*;
