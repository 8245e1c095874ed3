#![forbid(unsafe_code)]

pub mod curriculum;
pub mod model;
pub mod time;

pub use curriculum::{CurriculumError, ProgramPlan, Stage, WeekRange};
pub use time::Clock;
