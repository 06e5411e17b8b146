pub mod prelude;

pub mod coin_transactions;
pub mod items;
pub mod purchases;
pub mod users;
