pub mod dom;
pub mod evaluator;
pub mod generator;
pub mod resolver;
pub mod rule_model;
