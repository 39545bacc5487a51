//! BDD step definitions for the sentinel panel

pub mod controller_steps;
