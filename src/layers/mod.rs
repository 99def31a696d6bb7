pub mod linear;
pub mod param;

pub use linear::Linear;
pub use param::Parameter;
