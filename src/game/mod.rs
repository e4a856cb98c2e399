pub mod controller;
pub mod parser;
pub mod rematch;
pub mod rules;
pub mod session;
pub mod strategy;
pub mod utils;
pub mod validator;
