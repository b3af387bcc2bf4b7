//! Cache key builders.
//!
//! Keys are flat strings. List keys end with the raw notebook id, so prefix
//! invalidation of `notes:1` also drops `notes:10`; that costs an extra miss
//! but never serves stale data.
//!
//! Invalidation is not ordered against in-flight reads: a miss whose store
//! fetch began before a write can store the pre-write value after the write
//! has invalidated the key, and that value is then served until it expires.

pub const NOTEBOOK_LIST: &str = "notebooks:list";

pub fn notebook_list_key() -> &'static str {
    NOTEBOOK_LIST
}

pub fn notebook_key(id: &str) -> String {
    format!("notebook:{}", id)
}

pub fn notes_list_key(notebook_id: &str) -> String {
    format!("notes:{}", notebook_id)
}

pub fn sources_list_key(notebook_id: &str) -> String {
    format!("sources:{}", notebook_id)
}

pub fn chat_sessions_key(notebook_id: &str) -> String {
    format!("chat_sessions:{}", notebook_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        assert_eq!(notebook_list_key(), "notebooks:list");
        assert_eq!(notebook_key("abc"), "notebook:abc");
        assert_eq!(notes_list_key("abc"), "notes:abc");
        assert_eq!(sources_list_key("abc"), "sources:abc");
        assert_eq!(chat_sessions_key("abc"), "chat_sessions:abc");
    }

    #[test]
    fn test_list_key_is_not_a_notebook_key() {
        // "notebooks:list" must not fall under the "notebook:" prefix
        assert!(!notebook_list_key().starts_with("notebook:"));
    }
}
