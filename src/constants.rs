/// Coins granted to every user on first authentication.
pub const STARTING_BALANCE: i64 = 1000;

/// Shown in coin history when the counterpart row is gone.
pub const UNKNOWN_USERNAME: &str = "Unknown";

pub mod catalog {

    /// Seeded into an empty `items` table on startup.
    pub const ITEMS: &[(&str, i64)] = &[
        ("t-shirt", 80),
        ("cup", 20),
        ("book", 50),
        ("pen", 10),
        ("powerbank", 200),
        ("hoody", 300),
        ("umbrella", 200),
        ("socks", 10),
        ("wallet", 50),
        ("pink-hoody", 500),
    ];
}

pub mod messages {

    pub const CREDENTIALS_REQUIRED: &str = "Username and password are required.";

    pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

    pub const INVALID_TOKEN: &str = "Missing or invalid token.";

    pub const TRANSFER_FIELDS_REQUIRED: &str = "toUser and amount are required.";

    pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive integer.";

    pub const RECIPIENT_NOT_FOUND: &str = "Recipient user not found.";

    pub const NOT_ENOUGH_TO_SEND: &str = "Not enough coins to send.";

    pub const USER_NOT_FOUND: &str = "User not found.";

    pub const ITEM_NOT_AVAILABLE: &str = "Item not available.";

    pub const NOT_ENOUGH_TO_BUY: &str = "Not enough coins to buy this item.";

    pub const RESET_NOT_ALLOWED: &str = "Not allowed";

    pub const RESET_DONE: &str = "Database reset.";
}
