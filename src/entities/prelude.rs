pub use super::coin_transactions::Entity as CoinTransactions;
pub use super::items::Entity as Items;
pub use super::purchases::Entity as Purchases;
pub use super::users::Entity as Users;
