pub mod reconcile;
pub mod refdata;
