use redeploy::types::Coordinates;

/// Days a predecessor may have ended before a contract starts
pub const DEFAULT_WINDOW_DAYS: u32 = 10;

pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Campbellfield depot, the fallback depot of the Victorian hire dataset
pub const fn default_depot() -> Coordinates {
    Coordinates::new(-37.6805, 145.0064)
}
