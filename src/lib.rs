#![allow(non_snake_case)]

pub mod checker;
pub mod config;
pub mod diagnosis;
pub mod dimacs;
pub mod gipsat;
pub mod identify;
pub mod model;
pub mod statistic;
