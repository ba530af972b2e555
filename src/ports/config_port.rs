//! Configuration access port trait.
//!
//! Values come back as raw strings; typing and range checks live in
//! `domain::config_validation` so a bad value is reported, never defaulted.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
