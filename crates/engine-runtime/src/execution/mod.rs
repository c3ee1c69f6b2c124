pub mod batch_run;
pub mod executor;
pub mod report;
pub mod workers;
