// Version information for the image generation node

/// Full version string
pub const VERSION: &str = "v0.1.0-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";
