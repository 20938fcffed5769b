/// Lowest exchange rate a group currency can reach.
pub const MIN_RATE: u8 = 1;

/// Highest exchange rate a group currency can reach.
pub const MAX_RATE: u8 = 4;

/// Rate every group starts at (1 group unit = 1 common unit).
pub const INITIAL_RATE: u8 = 1;

/// Amount credited to the player and their group per accepted click.
pub const CLICK_REWARD: u64 = 1;

/// Minimum interval between two accepted clicks from one session.
pub const CLICK_INTERVAL_MS: u64 = 200;

/// Resolution delay of the single-player mock backend.
pub const MOCK_LATENCY_MS: u64 = 100;

/// Upper bound on players carried in one snapshot.
pub const MAX_SNAPSHOT_PLAYERS: usize = 1 << 16;

/// Snapshot format version (first byte of an encoded snapshot).
pub const SNAPSHOT_VERSION: u8 = 1;

/// Error messages surfaced to players.
pub const ERROR_NO_GROUP: &str = "no group selected";
pub const ERROR_GROUP_ALREADY_SELECTED: &str = "group already selected";
pub const ERROR_SAME_CURRENCY: &str = "cannot trade a currency for itself";
pub const ERROR_NON_POSITIVE_AMOUNT: &str = "amount must be positive";
pub const ERROR_RATE_LIMITED: &str = "clicking too fast";
pub const ERROR_MALFORMED_COMMAND: &str = "malformed command";
