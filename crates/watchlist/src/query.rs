/// Country the page filters on
pub const DEFAULT_COUNTRY: &str = "NATO";

/// Most recent record for one country. Column order matches
/// [`WatchlistRecord::from_row`](crate::WatchlistRecord::from_row).
pub const LATEST_WATCHLIST_SQL: &str = "SELECT watchlist, country, date_added, urls_used
FROM watchlist
WHERE country = ?1
ORDER BY date_added DESC
LIMIT 1";

/// Number of columns selected by [`LATEST_WATCHLIST_SQL`]
pub const LATEST_WATCHLIST_COLUMNS: usize = 4;
