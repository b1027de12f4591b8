use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Not every test binary uses every helper.
#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub config_path: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_image-version-checker"));

        Self {
            _temp_dir: temp_dir,
            config_path,
            bin_path,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.env("IVC_CONFIG_PATH", &self.config_path);
        cmd.env_remove("IVC_SKOPEO_PATH");
        cmd.env_remove("IVC_INSPECT_TIMEOUT_SECS");
        cmd.env_remove("IVC_DEFAULT_RULE");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Write a stand-in for skopeo that prints `document` and records its arguments.
    #[cfg(unix)]
    pub fn fake_skopeo(&self, document: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self._temp_dir.path().join("skopeo");
        let args_path = self._temp_dir.path().join("skopeo-args");
        let script = format!(
            "#!/bin/sh\necho \"$@\" > '{}'\ncat <<'JSON'\n{}\nJSON\n",
            args_path.display(),
            document
        );
        std::fs::write(&path, script).expect("Failed to write fake skopeo");
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    pub fn recorded_skopeo_args(&self) -> String {
        std::fs::read_to_string(self._temp_dir.path().join("skopeo-args"))
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[allow(dead_code)]
pub fn labelled(version: &str) -> String {
    format!(
        r#"{{"architecture": "amd64", "config": {{"Labels": {{"org.opencontainers.image.version": "{}"}}}}}}"#,
        version
    )
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.status.success(),
            "Command unexpectedly succeeded\nstdout: {}",
            self.stdout
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
