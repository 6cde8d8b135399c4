mod ball;
mod document;
mod innings;
mod match_record;
mod stats;

pub use ball::*;
pub use document::*;
pub use innings::*;
pub use match_record::*;
pub use stats::*;
