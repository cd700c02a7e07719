pub mod ledger;
pub mod models;

pub use ledger::{RosterFeed, RosterLedger};
pub use models::{pax_collection, PaxRecord, PaxSource};
