pub mod auth {

    pub const BOOTSTRAP_USERNAME: &str = "admin";

    pub const DEFAULT_BOOTSTRAP_PASSWORD: &str = "admin123";

    pub const SESSION_USER_KEY: &str = "user";
}

pub mod cache {

    pub const RECORDS_TTL_SECONDS: u64 = 30 * 60;
}
