pub mod convert;
pub mod engine;
pub mod jack;
pub mod manager;
pub mod peak_meter;
pub mod ports;
