pub mod batch;
pub mod compare;
pub mod evaluate;
pub mod synthesize;

pub use batch::*;
pub use compare::*;
pub use evaluate::*;
pub use synthesize::*;
