mod properties;
mod scenarios;
mod snapshot_resume;
