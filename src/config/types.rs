use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{RedeployError, Result};

/// Settings as read from the config file, before flags and env are applied.
///
/// The three identity fields have no sensible default and stay `None` until
/// something supplies them; [`Config::resolve`] rejects them if still unset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub image: Option<String>,
    pub container: Option<String>,
    pub project_path: Option<PathBuf>,
    pub mount_target: String,
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub runtime: String,
    #[serde(deserialize_with = "deserialize_run_args")]
    pub run_args: Vec<String>,
    pub follow_logs: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: None,
            container: None,
            project_path: None,
            mount_target: "/app".to_string(),
            context: PathBuf::from("."),
            dockerfile: None,
            runtime: "docker".to_string(),
            run_args: Vec::new(),
            follow_logs: true,
            log_file: None,
        }
    }
}

/// Values supplied on the command line or through `REDEPLOY_*` variables.
/// Every `Some` wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub image: Option<String>,
    pub container: Option<String>,
    pub project_path: Option<PathBuf>,
    pub mount_target: Option<String>,
    pub context: Option<PathBuf>,
    pub dockerfile: Option<PathBuf>,
    pub runtime: Option<String>,
    pub run_args: Option<Vec<String>>,
    pub follow_logs: Option<bool>,
    pub log_file: Option<PathBuf>,
}

/// Fully validated settings for one redeploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub image: String,
    pub container: String,
    /// Absolute host path bind-mounted into the container.
    pub project_path: PathBuf,
    pub mount_target: String,
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub runtime: String,
    pub run_args: Vec<String>,
    pub follow_logs: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn apply(&mut self, overrides: Overrides) {
        let Overrides {
            image,
            container,
            project_path,
            mount_target,
            context,
            dockerfile,
            runtime,
            run_args,
            follow_logs,
            log_file,
        } = overrides;

        if image.is_some() {
            self.image = image;
        }
        if container.is_some() {
            self.container = container;
        }
        if project_path.is_some() {
            self.project_path = project_path;
        }
        if let Some(v) = mount_target {
            self.mount_target = v;
        }
        if let Some(v) = context {
            self.context = v;
        }
        if dockerfile.is_some() {
            self.dockerfile = dockerfile;
        }
        if let Some(v) = runtime {
            self.runtime = v;
        }
        if let Some(v) = run_args {
            self.run_args = v;
        }
        if let Some(v) = follow_logs {
            self.follow_logs = v;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
    }

    /// Validate and resolve against the working directory.
    pub fn resolve(&self, cwd: &Path) -> Result<Deployment> {
        let image = required(self.image.as_deref(), "image", "image")?;
        if image.chars().any(char::is_whitespace) {
            return Err(RedeployError::InvalidSetting {
                field: "image",
                reason: format!("`{image}` contains whitespace"),
            });
        }

        let container = required(self.container.as_deref(), "container", "container")?;
        validate_container_name(container)?;

        let project_path = match self.project_path.as_deref() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => {
                return Err(RedeployError::MissingSetting {
                    field: "project_path",
                    flag: "project-path",
                });
            }
        };
        // The runtime reads a relative `-v` source as a named volume.
        let project_path = if project_path.is_absolute() {
            project_path.to_path_buf()
        } else {
            cwd.join(project_path)
        };

        if !self.mount_target.starts_with('/') {
            return Err(RedeployError::InvalidSetting {
                field: "mount_target",
                reason: format!("`{}` is not an absolute container path", self.mount_target),
            });
        }

        if self.runtime.trim().is_empty() {
            return Err(RedeployError::InvalidSetting {
                field: "runtime",
                reason: "runtime binary name is empty".to_string(),
            });
        }

        Ok(Deployment {
            image: image.to_string(),
            container: container.to_string(),
            project_path,
            mount_target: self.mount_target.clone(),
            context: self.context.clone(),
            dockerfile: self.dockerfile.clone(),
            runtime: self.runtime.clone(),
            run_args: self.run_args.clone(),
            follow_logs: self.follow_logs,
            log_file: self.log_file.clone(),
        })
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    flag: &'static str,
) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RedeployError::MissingSetting { field, flag }),
    }
}

/// Container names: `[a-zA-Z0-9][a-zA-Z0-9_.-]*`.
fn validate_container_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(RedeployError::InvalidSetting {
            field: "container",
            reason: format!("`{name}` is not a valid container name"),
        })
    }
}

/// Split a shell-quoted argument string the way a POSIX shell would.
pub fn split_run_args(raw: &str) -> std::result::Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(raw)
}

/// `run_args` accepts either a YAML list or a single shell-quoted string.
fn deserialize_run_args<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    struct RunArgsVisitor;

    impl<'de> Visitor<'de> for RunArgsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of arguments or a shell-quoted string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Vec<String>, E> {
            split_run_args(value).map_err(|e| E::custom(format!("run_args: {e}")))
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> std::result::Result<Vec<String>, A::Error> {
            let mut args = Vec::new();
            while let Some(arg) = seq.next_element::<String>()? {
                args.push(arg);
            }
            Ok(args)
        }
    }

    deserializer.deserialize_any(RunArgsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Config {
        Config {
            image: Some("bot1img".into()),
            container: Some("bot1".into()),
            project_path: Some("/srv/bot".into()),
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.mount_target, "/app");
        assert_eq!(cfg.context, PathBuf::from("."));
        assert_eq!(cfg.runtime, "docker");
        assert!(cfg.follow_logs);
        assert!(cfg.run_args.is_empty());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: Config = serde_yaml::from_str("image: bot1img\nfollow_logs: false\n").unwrap();
        assert_eq!(cfg.image.as_deref(), Some("bot1img"));
        assert!(!cfg.follow_logs);
        assert_eq!(cfg.mount_target, "/app");
    }

    #[test]
    fn run_args_accepts_list_or_string() {
        let cfg: Config =
            serde_yaml::from_str("run_args: [\"--restart\", \"unless-stopped\"]\n").unwrap();
        assert_eq!(cfg.run_args, vec!["--restart", "unless-stopped"]);

        let cfg: Config =
            serde_yaml::from_str("run_args: \"--env-file .env -e 'GREETING=hi there'\"\n")
                .unwrap();
        assert_eq!(
            cfg.run_args,
            vec!["--env-file", ".env", "-e", "GREETING=hi there"]
        );
    }

    #[test]
    fn run_args_rejects_unbalanced_quotes() {
        let result: std::result::Result<Config, _> =
            serde_yaml::from_str("run_args: \"-e 'oops\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut cfg = complete();
        cfg.apply(Overrides {
            image: Some("other".into()),
            follow_logs: Some(false),
            run_args: Some(vec!["--rm".into()]),
            ..Overrides::default()
        });
        assert_eq!(cfg.image.as_deref(), Some("other"));
        assert_eq!(cfg.container.as_deref(), Some("bot1"));
        assert!(!cfg.follow_logs);
        assert_eq!(cfg.run_args, vec!["--rm"]);
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let mut cfg = complete();
        cfg.apply(Overrides::default());
        assert_eq!(cfg, complete());
    }

    #[test]
    fn resolve_builds_deployment() {
        let d = complete().resolve(Path::new("/home/op")).unwrap();
        assert_eq!(d.image, "bot1img");
        assert_eq!(d.container, "bot1");
        assert_eq!(d.project_path, PathBuf::from("/srv/bot"));
        assert_eq!(d.mount_target, "/app");
    }

    #[test]
    fn resolve_makes_relative_project_path_absolute() {
        let mut cfg = complete();
        cfg.project_path = Some("bot".into());
        let d = cfg.resolve(Path::new("/home/op")).unwrap();
        assert_eq!(d.project_path, PathBuf::from("/home/op/bot"));
    }

    #[test]
    fn resolve_rejects_missing_identity_fields() {
        let mut cfg = complete();
        cfg.image = Some("   ".into());
        assert!(matches!(
            cfg.resolve(Path::new("/")),
            Err(RedeployError::MissingSetting { field: "image", .. })
        ));

        let mut cfg = complete();
        cfg.container = None;
        assert!(matches!(
            cfg.resolve(Path::new("/")),
            Err(RedeployError::MissingSetting { field: "container", .. })
        ));

        let mut cfg = complete();
        cfg.project_path = None;
        assert!(matches!(
            cfg.resolve(Path::new("/")),
            Err(RedeployError::MissingSetting {
                flag: "project-path",
                ..
            })
        ));
    }

    #[test]
    fn resolve_rejects_bad_container_names() {
        for bad in ["-bot", "bot one", "bot/1", ".hidden"] {
            let mut cfg = complete();
            cfg.container = Some(bad.into());
            assert!(
                matches!(
                    cfg.resolve(Path::new("/")),
                    Err(RedeployError::InvalidSetting { field: "container", .. })
                ),
                "{bad} should be rejected"
            );
        }

        let mut cfg = complete();
        cfg.container = Some("bot_1.prod-a".into());
        assert!(cfg.resolve(Path::new("/")).is_ok());
    }

    #[test]
    fn resolve_rejects_relative_mount_target() {
        let mut cfg = complete();
        cfg.mount_target = "app".into();
        assert!(matches!(
            cfg.resolve(Path::new("/")),
            Err(RedeployError::InvalidSetting {
                field: "mount_target",
                ..
            })
        ));
    }
}
