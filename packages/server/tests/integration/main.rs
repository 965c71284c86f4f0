
mod history;
mod ingest;
mod pg_store;
mod report;
mod summary;
