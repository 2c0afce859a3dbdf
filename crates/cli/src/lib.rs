#![warn(clippy::pedantic)]

pub mod chart;
pub mod logger;
pub mod readme;
pub mod report;
pub mod settings;
