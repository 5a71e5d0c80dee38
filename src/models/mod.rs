pub mod deepgram;
pub mod record;
pub mod result;
pub mod topic;

pub use deepgram::*;
pub use record::*;
pub use result::*;
pub use topic::*;
