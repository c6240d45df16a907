// src/lib.rs — Library root for shoprec

pub mod cli;
pub mod engine;
pub mod infra;
pub mod source;
pub mod util;
