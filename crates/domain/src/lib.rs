#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod aggregation;
mod exercise;
mod load;
mod name;
mod workout;

pub use aggregation::*;
pub use exercise::*;
pub use load::*;
pub use name::*;
pub use workout::*;
