pub mod ingest;
pub mod stats;

#[cfg(test)]
mod ingest_tests;
