pub mod versioning {

    /// Account versions wrap back to zero once they reach this value.
    pub const VERSION_CEILING: i32 = 100_000;
}

pub mod sessions {

    pub const DEFAULT_TTL_DAYS: i64 = 7;

    /// Length in bytes of a raw session token before hex encoding.
    pub const TOKEN_BYTES: usize = 32;
}

pub mod limits {

    pub const DESCRIPTION_MAX_CHARS: usize = 128;

    pub const NAME_MAX_CHARS: usize = 128;

    pub const USERNAME_MIN_CHARS: usize = 3;

    pub const USERNAME_MAX_CHARS: usize = 64;

    pub const PASSWORD_MIN_CHARS: usize = 8;
}

pub mod bootstrap {

    pub const USERNAME: &str = "admin";

    pub const PASSWORD: &str = "password";
}
