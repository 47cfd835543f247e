//! Centralized constants (§10 "Configuration"), trimmed to what a sandbox-free
//! interpreter needs: version/banner text, the REPL prompt, and the
//! `*host-language*` tag. Mirrors the teacher's `src/config.rs` centralizing role.

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "mal-rs";
pub const WELCOME_SUBTITLE: &str = "A MAL (Make-A-Lisp) interpreter in Rust";

/// The REPL prompt (§6: `user> `).
pub const PROMPT: &str = "user> ";

/// Bound to `*host-language*` (§6).
pub const HOST_LANGUAGE: &str = "rust";

/// History dotfile persisted in the user's home directory across sessions (§6,
/// §10 "REPL line editing").
pub const HISTORY_FILE_NAME: &str = ".mal_history";
