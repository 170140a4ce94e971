pub const VIDEO_EXTENSION: &str = "mp4";

pub mod catalog {

    pub const EPISODE_NAME_PREFIX: &str = "Episodio";

    pub const REFERENCE_SEPARATOR: char = '-';
}

pub mod tokens {

    pub const DEFAULT_TTL_SECONDS: u64 = 300;

    pub const MIN_SECRET_LEN: usize = 32;
}

pub mod intervals {
    use std::time::Duration;

    pub const DEFAULT_UPSERT_INTERVAL: Duration = Duration::from_millis(250);
}

pub mod limits {

    pub const MAX_REFERENCE_LEN: usize = 512;

    pub const MAX_INGEST_BODY_BYTES: usize = 8 * 1024 * 1024;
}
