// Application constants

/// Name of the per-project config document at the project root
pub const CONFIG_FILE_NAME: &str = "micropy-config.json";

/// Prefix for every user-facing log line
pub const LOG_PREFIX: &str = "[micropy-sync]";

/// Quick-pick entry that switches port selection to free text input
pub const PORT_NOT_LISTED: &str = "Not in this list?";

/// Directory scanned for candidate serial ports
pub const DEVICE_DIR: &str = "/dev";

/// Environment variable pointing at a settings override file
pub const SETTINGS_ENV_VAR: &str = "MICROPY_SYNC_SETTINGS";

/// Files scaffolded by `init`, skipped when already present
pub const SCAFFOLD_FILES: &[(&str, &str)] = &[
    (
        "main.py",
        "# This is your main project file\n\n\nprint(\"Hello, world!\")\n",
    ),
    (
        "boot.py",
        "# This file will open after device boot or wake from deep sleep...\n\n\n",
    ),
];
