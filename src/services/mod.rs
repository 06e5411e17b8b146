pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod token;
pub use token::TokenIssuer;

pub mod wallet_service;
pub use wallet_service::{WalletError, WalletInfo, WalletService};

pub mod wallet_service_impl;
pub use wallet_service_impl::SeaOrmWalletService;
