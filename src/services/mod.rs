// Core services
pub mod catalog;
pub mod currency;
