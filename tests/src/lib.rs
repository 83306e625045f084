//! Simulated chain and fixtures for exercising migrations without a node

pub mod chain;
