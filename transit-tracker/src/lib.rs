//! Transit proximity tracker server.
//!
//! A web application that answers: "how many stops away is the next
//! vehicle on my route?" and keeps answering as the vehicles move.

pub mod config;
pub mod domain;
pub mod proximity;
pub mod topology;
pub mod tracking;
pub mod trimet;
pub mod web;

#[cfg(test)]
mod test_support;
