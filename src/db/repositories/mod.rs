pub mod item;
pub mod ledger;
pub mod user;
