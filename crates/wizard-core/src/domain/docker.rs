//! Argument assembly for `docker` and `docker-compose`.
//!
//! Nothing here spawns a process: drivers only produce [`Invocation`]s that
//! the application layer hands to a `ProcessRunner`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::BuildType;

const DOCKER: &str = "docker";
const DOCKER_COMPOSE: &str = "docker-compose";
const COMPOSE_BASE_FILE: &str = "docker-compose.yml";
const NODE_ENV: &str = "NODE_ENV";

// ── Invocation ─────────────────────────────────────────────────────────────

/// A program and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Human readable summary printed before running.
    pub description: String,
}

impl Invocation {
    pub fn new(program: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The full command line, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

// ── Configuration shapes ───────────────────────────────────────────────────

/// Which tool manages a project's containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Docker,
    #[default]
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerOption {
    Detach,
    Interactive,
    Remove,
    AttachToNetwork,
}

/// A container started by the raw docker engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub options: Vec<ContainerOption>,
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvPair {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub external: u16,
    pub internal: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMapping {
    /// Appended to the project root; empty mounts the root itself.
    #[serde(default)]
    pub host: String,
    pub container: String,
}

/// Runtime parameters of a container or compose service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeDescriptor {
    #[serde(default)]
    pub env: Vec<EnvPair>,
    #[serde(default)]
    pub ports: Option<PortMapping>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub volumes: Vec<VolumeMapping>,
    #[serde(default)]
    pub work_dir: Option<String>,
}

/// A command run inside the app container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub comment: String,
    pub params: Vec<String>,
    /// Allocate a terminal (`-it` for docker, no `-T` for compose).
    #[serde(default = "default_tty")]
    pub tty: bool,
}

fn default_tty() -> bool {
    true
}

impl CommandSpec {
    /// Copy of this command with `extra` appended to its parameters.
    pub fn with_params<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = self.clone();
        command.params.extend(extra.into_iter().map(Into::into));
        command
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub follow: bool,
    pub timestamps: bool,
}

impl LogOptions {
    fn flags(self) -> impl Iterator<Item = &'static str> {
        [(self.follow, "-f"), (self.timestamps, "-t")]
            .into_iter()
            .filter_map(|(on, flag)| on.then_some(flag))
    }
}

// ── Driver seam ────────────────────────────────────────────────────────────

/// Builds the invocations that manage one project's environment.
pub trait EnvironmentDriver {
    /// Bring the environment up for `build`.
    fn up(&self, build: BuildType) -> Vec<Invocation>;

    /// Run `command` inside `target` (container or service name).
    fn exec(&self, target: &str, command: &CommandSpec) -> Invocation;

    /// Tear the environment down; `clean` also removes images and volumes.
    fn down(&self, clean: bool) -> Vec<Invocation>;

    fn logs(&self, target: &str, options: LogOptions) -> Invocation;
}

fn user_of<'a>(runtimes: &'a BTreeMap<String, RuntimeDescriptor>, target: &str) -> Option<&'a str> {
    runtimes.get(target).and_then(|r| r.user.as_deref())
}

// ── Raw docker engine ──────────────────────────────────────────────────────

/// Drives individual containers on a dedicated network.
#[derive(Debug, Clone)]
pub struct DockerDriver {
    network: String,
    root: PathBuf,
    containers: Vec<ContainerSpec>,
    runtimes: BTreeMap<String, RuntimeDescriptor>,
}

impl DockerDriver {
    pub fn new(
        network: impl Into<String>,
        root: impl Into<PathBuf>,
        containers: Vec<ContainerSpec>,
        runtimes: BTreeMap<String, RuntimeDescriptor>,
    ) -> Self {
        Self {
            network: network.into(),
            root: root.into(),
            containers,
            runtimes,
        }
    }

    pub fn create_network(&self) -> Invocation {
        Invocation::new(DOCKER, "Creating docker network").args([
            "network",
            "create",
            self.network.as_str(),
        ])
    }

    pub fn remove_network(&self) -> Invocation {
        Invocation::new(DOCKER, "Removing docker network").args([
            "network",
            "rm",
            self.network.as_str(),
        ])
    }

    pub fn run_container(&self, spec: &ContainerSpec, build: BuildType) -> Invocation {
        let mut inv = Invocation::new(DOCKER, format!("Creating {} container", spec.name))
            .args(["run", "--name", spec.name.as_str()]);

        if let Some(runtime) = self.runtimes.get(&spec.name) {
            inv = inv.args(runtime_args(runtime, build, &self.root));
        }

        for option in &spec.options {
            inv = match option {
                ContainerOption::Detach => inv.arg("-d"),
                ContainerOption::Interactive => inv.arg("-it"),
                ContainerOption::Remove => inv.arg("--rm"),
                ContainerOption::AttachToNetwork => inv.args(["--network", self.network.as_str()]),
            };
        }

        inv.arg(&spec.image).args(spec.command.iter().cloned())
    }

    pub fn stop(&self) -> Invocation {
        Invocation::new(DOCKER, "Stopping docker containers")
            .arg("stop")
            .args(self.containers.iter().map(|c| c.name.clone()))
    }

    /// `docker rm` for every container not started with `--rm`, which
    /// docker removes by itself on stop. `None` when there are none left.
    pub fn remove_containers(&self) -> Option<Invocation> {
        let names: Vec<_> = self
            .containers
            .iter()
            .filter(|c| !c.options.contains(&ContainerOption::Remove))
            .map(|c| c.name.clone())
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(
            Invocation::new(DOCKER, "Removing docker containers")
                .arg("rm")
                .args(names),
        )
    }

    pub fn remove_images(&self) -> Invocation {
        Invocation::new(DOCKER, "Removing docker images")
            .arg("rmi")
            .args(self.containers.iter().map(|c| c.image.clone()))
    }
}

/// `-e`, `-p`, `-u`, `-v` and `-w` arguments for a runtime.
fn runtime_args(runtime: &RuntimeDescriptor, build: BuildType, root: &Path) -> Vec<String> {
    let mut args = Vec::new();

    for EnvPair { key, value } in &runtime.env {
        let value = if key == NODE_ENV { build.as_str() } else { value };
        args.push("-e".into());
        args.push(format!("{key}={value}"));
    }
    if let Some(ports) = runtime.ports {
        args.push("-p".into());
        args.push(format!("{}:{}", ports.external, ports.internal));
    }
    if let Some(user) = &runtime.user {
        args.push("-u".into());
        args.push(user.clone());
    }
    for volume in &runtime.volumes {
        args.push("-v".into());
        args.push(format!("{}{}:{}", root.display(), volume.host, volume.container));
    }
    if let Some(dir) = &runtime.work_dir {
        args.push("-w".into());
        args.push(dir.clone());
    }

    args
}

impl EnvironmentDriver for DockerDriver {
    fn up(&self, build: BuildType) -> Vec<Invocation> {
        std::iter::once(self.create_network())
            .chain(self.containers.iter().map(|c| self.run_container(c, build)))
            .collect()
    }

    fn exec(&self, target: &str, command: &CommandSpec) -> Invocation {
        let mut inv = Invocation::new(DOCKER, &command.comment).arg("exec");
        if command.tty {
            inv = inv.arg("-it");
        }
        if let Some(user) = user_of(&self.runtimes, target) {
            inv = inv.args(["-u", user]);
        }
        inv.arg(target).args(command.params.iter().cloned())
    }

    fn down(&self, clean: bool) -> Vec<Invocation> {
        // A stopped container keeps its name; the next `up` needs it free.
        let mut steps = vec![self.stop()];
        steps.extend(self.remove_containers());
        if clean {
            steps.push(self.remove_images());
        }
        steps.push(self.remove_network());
        steps
    }

    fn logs(&self, target: &str, options: LogOptions) -> Invocation {
        Invocation::new(DOCKER, format!("Displaying {target} logs"))
            .arg("logs")
            .args(options.flags())
            .arg(target)
    }
}

// ── Compose engine ─────────────────────────────────────────────────────────

/// Drives a `docker-compose` project with per-build override files.
#[derive(Debug, Clone)]
pub struct ComposeDriver {
    project: String,
    runtimes: BTreeMap<String, RuntimeDescriptor>,
}

impl ComposeDriver {
    pub fn new(project: impl Into<String>, runtimes: BTreeMap<String, RuntimeDescriptor>) -> Self {
        Self {
            project: project.into(),
            runtimes,
        }
    }

    fn base(&self, description: impl Into<String>) -> Invocation {
        Invocation::new(DOCKER_COMPOSE, description).args([
            "-p",
            self.project.as_str(),
            "-f",
            COMPOSE_BASE_FILE,
        ])
    }

    /// Override file for `build`, e.g. `docker-compose.dev.yml`.
    pub fn override_file(build: BuildType) -> String {
        format!("docker-compose.{}.yml", build.suffix())
    }
}

impl EnvironmentDriver for ComposeDriver {
    fn up(&self, build: BuildType) -> Vec<Invocation> {
        vec![
            self.base(format!("Creating environment for {build}"))
                .args(["-f".to_owned(), Self::override_file(build)])
                .args(["up", "-d", "--build"]),
        ]
    }

    fn exec(&self, target: &str, command: &CommandSpec) -> Invocation {
        let mut inv = self.base(&command.comment).arg("exec");
        if !command.tty {
            inv = inv.arg("-T");
        }
        if let Some(user) = user_of(&self.runtimes, target) {
            inv = inv.args(["-u", user]);
        }
        inv.arg(target).args(command.params.iter().cloned())
    }

    fn down(&self, clean: bool) -> Vec<Invocation> {
        let mut inv = self.base("Stopping docker containers").arg("down");
        if clean {
            inv = inv.args(["--rmi", "all", "-v"]);
        }
        vec![inv]
    }

    fn logs(&self, target: &str, options: LogOptions) -> Invocation {
        self.base(format!("Displaying {target} logs"))
            .arg("logs")
            .args(options.flags())
            .arg(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react_runtime() -> RuntimeDescriptor {
        RuntimeDescriptor {
            env: vec![
                EnvPair {
                    key: "NODE_ENV".into(),
                    value: "development".into(),
                },
                EnvPair {
                    key: "PORT".into(),
                    value: "3000".into(),
                },
            ],
            ports: Some(PortMapping {
                external: 3000,
                internal: 3000,
            }),
            user: Some("node".into()),
            volumes: vec![VolumeMapping {
                host: String::new(),
                container: "/home/node/app".into(),
            }],
            work_dir: Some("/home/node/app".into()),
        }
    }

    fn docker_driver() -> DockerDriver {
        DockerDriver::new(
            "my_app",
            "/work/demo",
            vec![ContainerSpec {
                name: "react".into(),
                image: "node:12".into(),
                options: vec![
                    ContainerOption::Detach,
                    ContainerOption::Interactive,
                    ContainerOption::AttachToNetwork,
                ],
                command: vec![],
            }],
            BTreeMap::from([("react".to_owned(), react_runtime())]),
        )
    }

    fn tests_command() -> CommandSpec {
        CommandSpec {
            comment: "Running tests".into(),
            params: vec!["npm".into(), "test".into()],
            tty: false,
        }
    }

    #[test]
    fn run_container_orders_runtime_then_options_then_image() {
        let driver = docker_driver();
        let spec = &driver.containers[0].clone();
        let inv = driver.run_container(spec, BuildType::Testing);

        assert_eq!(
            inv.command_line(),
            "docker run --name react -e NODE_ENV=testing -e PORT=3000 -p 3000:3000 -u node \
             -v /work/demo:/home/node/app -w /home/node/app -d -it --network my_app node:12"
        );
    }

    #[test]
    fn docker_up_creates_network_first() {
        let steps = docker_driver().up(BuildType::Development);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].args, ["network", "create", "my_app"]);
        assert!(steps[1].args.contains(&"NODE_ENV=development".to_owned()));
    }

    #[test]
    fn docker_exec_uses_runtime_user() {
        let mut command = tests_command();
        command.tty = true;
        let inv = docker_driver().exec("react", &command);
        assert_eq!(inv.command_line(), "docker exec -it -u node react npm test");
    }

    #[test]
    fn docker_down_with_clean_removes_images() {
        let clean = docker_driver().down(true);
        let lines: Vec<_> = clean.iter().map(Invocation::command_line).collect();
        assert_eq!(
            lines,
            [
                "docker stop react",
                "docker rm react",
                "docker rmi node:12",
                "docker network rm my_app",
            ]
        );
    }

    #[test]
    fn docker_down_frees_container_names_for_the_next_up() {
        let driver = docker_driver();
        let lines: Vec<_> = driver
            .up(BuildType::Development)
            .into_iter()
            .chain(driver.down(false))
            .chain(driver.up(BuildType::Development))
            .map(|inv| inv.command_line())
            .collect();

        let runs: Vec<_> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.starts_with("docker run --name react"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(runs.len(), 2);
        let between = &lines[runs[0] + 1..runs[1]];
        assert!(between.contains(&"docker rm react".to_owned()), "{between:?}");
        assert!(!between.iter().any(|l| l.starts_with("docker rmi")));
    }

    #[test]
    fn self_removing_containers_are_not_removed_twice() {
        let mut driver = docker_driver();
        driver.containers[0].options.push(ContainerOption::Remove);
        assert!(driver.remove_containers().is_none());

        let lines: Vec<_> = driver.down(false).iter().map(Invocation::command_line).collect();
        assert_eq!(lines, ["docker stop react", "docker network rm my_app"]);
    }

    #[test]
    fn compose_up_selects_override_file() {
        let driver = ComposeDriver::new("my_api", BTreeMap::new());
        let inv = &driver.up(BuildType::Production)[0];
        assert_eq!(
            inv.command_line(),
            "docker-compose -p my_api -f docker-compose.yml -f docker-compose.prod.yml up -d --build"
        );
    }

    #[test]
    fn compose_exec_without_tty_passes_t_flag() {
        let runtimes = BTreeMap::from([(
            "node".to_owned(),
            RuntimeDescriptor {
                user: Some("node".into()),
                ..RuntimeDescriptor::default()
            },
        )]);
        let driver = ComposeDriver::new("my_api", runtimes);
        let inv = driver.exec("node", &tests_command());
        assert_eq!(
            inv.command_line(),
            "docker-compose -p my_api -f docker-compose.yml exec -T -u node node npm test"
        );
        assert_eq!(inv.description, "Running tests");
    }

    #[test]
    fn compose_down_and_logs_flags() {
        let driver = ComposeDriver::new("my_api", BTreeMap::new());
        assert!(driver.down(true)[0].command_line().ends_with("down --rmi all -v"));
        assert!(driver.down(false)[0].command_line().ends_with("down"));

        let logs = driver.logs(
            "postgres",
            LogOptions {
                follow: true,
                timestamps: true,
            },
        );
        assert!(logs.command_line().ends_with("logs -f -t postgres"));
    }

    #[test]
    fn command_spec_with_params_leaves_original_untouched() {
        let base = tests_command();
        let extended = base.with_params(["dist/tests/**/*.test.js"]);
        assert_eq!(base.params.len(), 2);
        assert_eq!(extended.params.last().unwrap(), "dist/tests/**/*.test.js");
    }
}
