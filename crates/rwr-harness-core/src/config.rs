//! Server installation and test package configuration

use std::path::PathBuf;

/// Location of the RWR server installation and the local staging inputs
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server installation root (working directory for the server process)
    pub server_root: PathBuf,
    /// Server executable
    pub server_exe: PathBuf,
    /// Fixed package config copied into every staged package
    pub package_config: PathBuf,
    /// Startup script template with `{name}`, `{port}` and `{register}` placeholders
    pub script_template: PathBuf,
    /// Filename the rendered script is staged under (inside `scripts/`)
    pub script_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        // Default Steam install location (the dedicated server ships Windows-first)
        let root =
            PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common\RunningWithRifles");

        Self {
            server_exe: root.join("rwr_server.exe"),
            server_root: root,
            package_config: PathBuf::from("assets/package_config.xml"),
            script_template: PathBuf::from("assets/start_marshalrwr_test.as"),
            script_name: "start_marshalrwr_test.as".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config for a Linux Steam install
    pub fn linux() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        let root =
            PathBuf::from(home).join(".local/share/Steam/steamapps/common/RunningWithRifles");

        Self {
            server_exe: root.join("rwr_server"),
            server_root: root,
            ..Default::default()
        }
    }

    /// Packages directory under the installation root
    pub fn packages_root(&self) -> PathBuf {
        self.server_root.join("media/packages")
    }
}

/// Identity of one test-server run
#[derive(Debug, Clone)]
pub struct TestPackage {
    /// Caller-supplied run identifier
    pub name: String,
    /// Game port the server listens on
    pub port: u16,
    /// Serverlist registration flag, passed through to the script verbatim
    pub register: String,
}

impl TestPackage {
    /// Create a test package identity
    pub fn new(name: impl Into<String>, port: u16, register: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port,
            register: register.into(),
        }
    }

    /// Directory name of the staged package
    pub fn dir_name(&self) -> String {
        format!("_marshalrwr_{}_test_pkg", self.name)
    }

    /// Absolute staging directory under the server's packages root
    pub fn package_dir(&self, config: &ServerConfig) -> PathBuf {
        config.packages_root().join(self.dir_name())
    }

    /// Package path as the server console expects it (always forward slashes)
    pub fn relative_path(&self) -> String {
        format!("media/packages/{}", self.dir_name())
    }

    /// Display name the server runs under
    pub fn server_name(&self) -> String {
        format!("MRWR_{}", self.name)
    }
}
