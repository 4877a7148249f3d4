#![allow(dead_code)]

use std::io::{BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome of a `bull-scaler` run that was expected to terminate on its own.
pub struct ExitReport {
    pub success: bool,
    pub code: Option<i32>,
    pub output: String,
    /// Whether anything ever accepted connections on the listen address.
    pub listener_seen: bool,
}

/// Process configuration for one `bull-scaler` run. Starts from an empty
/// environment so nothing leaks in from the test runner.
pub struct ScalerCommand {
    env: Vec<(String, String)>,
    config_toml: Option<String>,
    listen_addr: String,
}

impl ScalerCommand {
    pub fn new() -> Self {
        let listen_addr = format!("127.0.0.1:{}", free_port());
        Self {
            env: vec![("LISTEN_ADDR".to_string(), listen_addr.clone())],
            config_toml: None,
            listen_addr,
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn config(mut self, toml: &str) -> Self {
        self.config_toml = Some(toml.to_string());
        self
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    fn spawn(&self, work_dir: &tempfile::TempDir) -> Child {
        let mut command = Command::new(scaler_binary());
        command
            .env_clear()
            .env("RUST_LOG", "info")
            .current_dir(work_dir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(toml) = &self.config_toml {
            let path = work_dir.path().join("bull-scaler.toml");
            std::fs::write(&path, toml).expect("write config");
            command.env("BULL_SCALER_CONFIG", path.to_str().unwrap());
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }

        command.spawn().expect("start bull-scaler")
    }

    /// Run the binary and wait for it to exit on its own.
    pub fn run_to_exit(&self) -> ExitReport {
        let work_dir = tempfile::tempdir().expect("create temp dir");
        let mut child = self.spawn(&work_dir);

        let start = Instant::now();
        let mut listener_seen = false;
        let status = loop {
            if TcpStream::connect(&self.listen_addr).is_ok() {
                listener_seen = true;
            }
            if let Some(status) = child.try_wait().expect("poll bull-scaler") {
                break status;
            }
            if start.elapsed() > Duration::from_secs(20) {
                let _ = child.kill();
                panic!("bull-scaler did not exit within 20s");
            }
            std::thread::sleep(Duration::from_millis(25));
        };

        let output = child.wait_with_output().expect("collect output");
        ExitReport {
            success: status.success(),
            code: status.code(),
            output: format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ),
            listener_seen,
        }
    }

    /// Start the binary and wait until it accepts connections.
    pub fn start(self) -> RunningScaler {
        let work_dir = tempfile::tempdir().expect("create temp dir");
        let mut child = self.spawn(&work_dir);

        // Drain output so the process never blocks on a full pipe.
        for pipe in [
            child.stdout.take().map(|s| Box::new(s) as Box<dyn std::io::Read + Send>),
            child.stderr.take().map(|s| Box::new(s) as Box<dyn std::io::Read + Send>),
        ]
        .into_iter()
        .flatten()
        {
            std::thread::spawn(move || {
                for line in BufReader::new(pipe).lines() {
                    if line.is_err() {
                        break;
                    }
                }
            });
        }

        let start = Instant::now();
        let mut connected = false;
        while start.elapsed() < Duration::from_secs(10) {
            if TcpStream::connect(&self.listen_addr).is_ok() {
                connected = true;
                break;
            }
            if let Ok(Some(status)) = child.try_wait() {
                panic!("bull-scaler exited early with {status}");
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(
            connected,
            "bull-scaler did not become reachable at {} within 10s",
            self.listen_addr
        );

        RunningScaler {
            child: Some(child),
            addr: format!("http://{}", self.listen_addr),
            _work_dir: work_dir,
        }
    }
}

/// A running `bull-scaler`, killed on drop.
pub struct RunningScaler {
    child: Option<Child>,
    addr: String,
    _work_dir: tempfile::TempDir,
}

impl RunningScaler {
    /// The HTTP address of the running server (e.g., "http://127.0.0.1:12345").
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Drop for RunningScaler {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Port of the Redis server used by live tests, if one was provided.
pub fn live_redis_port() -> Option<u16> {
    std::env::var("BULL_SCALER_E2E_REDIS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
}

/// Find a free TCP port. Nothing listens on it once this returns.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to free port");
    listener.local_addr().unwrap().port()
}

fn scaler_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bull-scaler"))
}
