pub mod assembler;
pub mod iterative;
pub mod time_axis;
