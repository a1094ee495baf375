//! Starter data for new users.

use sea_orm::{ActiveModelTrait, ConnectionTrait};

use crate::{Account, Category, Currency, ResultEngine, accounts, categories};

/// `(name, icon)`
pub const DEFAULT_ACCOUNTS: [(&str, &str); 3] = [
    ("Cash Wallet", "Wallet"),
    ("Savings Account", "Landmark"),
    ("Credit Card", "CreditCard"),
];

/// `(name, icon, color)`
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Food & Dining", "Utensils", "#ef4444"),
    ("Transportation", "Car", "#3b82f6"),
    ("Shopping", "ShoppingCart", "#a855f7"),
    ("Housing & Rent", "Home", "#f59e0b"),
    ("Bills & Utilities", "Zap", "#10b981"),
    ("Health & Wellness", "Heart", "#ec4899"),
    ("Education", "GraduationCap", "#6366f1"),
    ("Travel", "Plane", "#06b6d4"),
    ("Coffee & Snacks", "Coffee", "#78350f"),
    ("Entertainment", "Gift", "#f43f5e"),
];

/// Seed a user with the default accounts and categories.
///
/// Runs once, inside the unit of work that creates the user. Calling it twice
/// for the same user creates duplicates; the caller guarantees it does not.
pub(crate) async fn provision_defaults<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> ResultEngine<()> {
    for (name, icon) in DEFAULT_ACCOUNTS {
        let account = Account::new(
            user_id.to_string(),
            name.to_string(),
            0,
            Currency::Php,
            icon.to_string(),
        );
        accounts::insert(db, &account).await?;
    }

    for (name, icon, color) in DEFAULT_CATEGORIES {
        let category = Category::new(
            user_id.to_string(),
            name.to_string(),
            icon.to_string(),
            color.to_string(),
        );
        categories::ActiveModel::from(&category).insert(db).await?;
    }

    tracing::info!(
        user_id,
        accounts = DEFAULT_ACCOUNTS.len(),
        categories = DEFAULT_CATEGORIES.len(),
        "provisioned default data"
    );
    Ok(())
}
