//! sheetxfer_engine - Column aggregation and cell-write engine.

pub mod engine;
