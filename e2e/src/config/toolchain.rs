//! External tools the sequencer drives

use std::path::PathBuf;

pub const DEFAULT_APP_COMMAND: &str = "nocobase";
pub const DEFAULT_NPX_COMMAND: &str = "npx";
pub const DEFAULT_AUTH_STATE_PATH: &str = "storage/playwright/.auth/codegen.auth.json";

pub const ENV_APP_COMMAND: &str = "E2E_APP_COMMAND";
pub const ENV_NPX_COMMAND: &str = "E2E_NPX_COMMAND";
pub const ENV_AUTH_STATE: &str = "E2E_AUTH_STATE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// App CLI used for `install -f`, `dev` and `start`
    pub app_command: String,
    /// Package runner used to reach Playwright
    pub npx_command: String,
    /// Browser storage state shared between codegen sessions
    pub auth_state_path: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            app_command: DEFAULT_APP_COMMAND.to_string(),
            npx_command: DEFAULT_NPX_COMMAND.to_string(),
            auth_state_path: PathBuf::from(DEFAULT_AUTH_STATE_PATH),
        }
    }
}
