//! Configuration access port trait.

use std::collections::HashMap;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// All key/value pairs of one section; empty if the section is absent.
    /// Used for free-form parameter mappings that have no fixed schema.
    fn get_section(&self, section: &str) -> HashMap<String, String>;
}
