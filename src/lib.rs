pub mod assembler;
pub mod backend;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod dividends;
pub mod events;
pub mod export;
pub mod format;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod open_finance;
pub mod provenance;
