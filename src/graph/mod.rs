pub mod node;
pub mod tape;

pub use node::{Node, NodeId, Op};
pub use tape::Tape;
