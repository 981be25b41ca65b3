//! Configuration access port trait.

/// Raw key lookup. Values come back trimmed, and a blank value reads as
/// unset; typed parsing and validation live in `RunConfig::from_config`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
