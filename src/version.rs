//! Version information for mdialog

/// The version of mdialog, set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the package
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Name and version, as reported by the CLI
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version() {
        assert_eq!(APP_NAME, "mdialog");
        assert_eq!(full_version(), format!("mdialog v{}", VERSION));
    }
}
