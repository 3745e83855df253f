//! bfhl-service: dispatches a JSON body to one of five small computations
//! (Fibonacci, prime filter, LCM, HCF, one-word AI answer) and answers with
//! a uniform envelope.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
