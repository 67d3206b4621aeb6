pub mod auth;
pub mod availabilities;
pub mod pay_stubs;
pub mod punches;
pub mod shifts;
