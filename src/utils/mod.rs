pub mod record_locks;
