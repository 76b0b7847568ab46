pub mod diff;
pub mod inputs;
pub mod render;
pub mod run;
