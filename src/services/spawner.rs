use crate::error::Result;
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Запуск команд "выстрелил и забыл": результат процесса не ожидается
pub trait Spawner: Send + Sync {
    fn spawn(&self, command_line: &str) -> Result<()>;
}

/// Запуск через `sh -c`, как в командной строке. Завершившиеся процессы
/// подбирает tokio, зомби не остаются.
pub struct ShellSpawner;

impl Spawner for ShellSpawner {
    fn spawn(&self, command_line: &str) -> Result<()> {
        if command_line.trim().is_empty() {
            debug!("Пустая команда, запуск пропущен");
            return Ok(());
        }

        let child = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .spawn()?;

        info!("Запущено: {} (pid {:?})", command_line, child.id());
        Ok(())
    }
}

/// Dry-run: команды только логируются и запоминаются
#[derive(Default)]
pub struct DryRunSpawner {
    spawned: Mutex<Vec<String>>,
}

impl DryRunSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().clone()
    }
}

impl Spawner for DryRunSpawner {
    fn spawn(&self, command_line: &str) -> Result<()> {
        info!("[DRY RUN] Запуск: {}", command_line);
        self.spawned.lock().push(command_line.to_string());
        Ok(())
    }
}

pub fn create_spawner(dry_run: bool) -> std::sync::Arc<dyn Spawner> {
    if dry_run {
        std::sync::Arc::new(DryRunSpawner::new())
    } else {
        std::sync::Arc::new(ShellSpawner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_spawner_records_commands() {
        let spawner = DryRunSpawner::new();
        spawner.spawn("firefox").unwrap();
        spawner.spawn("gnome-terminal --tab").unwrap();
        assert_eq!(spawner.spawned(), vec!["firefox", "gnome-terminal --tab"]);
    }

    #[tokio::test]
    async fn test_shell_spawner_runs_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("spawned");
        let command = format!("touch '{}'", marker.display());

        ShellSpawner.spawn(&command).unwrap();

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_shell_spawner_skips_empty_command() {
        assert!(ShellSpawner.spawn("   ").is_ok());
    }
}
