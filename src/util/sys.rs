/// Unset and empty are treated the same, so a variable can be switched off
/// with `VAR= cmd`.
pub fn env_var_non_empty(name: &str) -> bool {
    std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false)
}
