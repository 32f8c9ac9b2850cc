pub mod session {

    /// One fixed cookie name for the whole service.
    pub const COOKIE_NAME: &str = "auth-key";

    pub const MAX_AGE_DAYS: i64 = 7;

    /// Session value keys written at login.
    pub const NAME_KEY: &str = "name";

    pub const PASSWORD_KEY: &str = "password";
}
