/// Column headers of the note table, in display and export order
pub const TABLE_HEADER: [&str; 5] = [
    "Creation Date",
    "Text",
    "User",
    "Last Modified",
    "Attachments",
];

/// Number of columns in the note table
pub const COLUMN_COUNT: usize = TABLE_HEADER.len();

/// Index of the Text column (the one the table filter applies to)
pub const TEXT_COLUMN: usize = 1;

/// Separator placed between attachment names inside a single cell
pub const ATTACHMENT_SEPARATOR: &str = "\n";

/// Storage format for timestamps. Naive local time with microseconds, which is
/// what existing note databases contain.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// PBKDF2 iteration count used when hashing new passwords
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 29_000;

/// Salt size in bytes for new password hashes
pub const SALT_SIZE: usize = 16;

/// Derived key size in bytes (SHA-256 output)
pub const HASH_SIZE: usize = 32;

/// Identifier prefix of the modular-crypt hash format
pub const PBKDF2_SHA256_IDENT: &str = "pbkdf2-sha256";

/// Status message returned after a successful commit
pub const COMMIT_OK_MESSAGE: &str = "Note Committed Successfully";

/// Login attempts granted before giving up
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;
