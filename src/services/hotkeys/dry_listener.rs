use crate::error::Result;
use crate::events::{Accelerator, ActionId};
use std::io::BufRead;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use super::GrabTable;
use super::HotkeyListenerTrait;

/// Dry-run слушатель: каждая строка stdin трактуется как нажатое сочетание
pub struct DryRunHotkeyListener {
    grabs: GrabTable,
    sender: UnboundedSender<ActionId>,
}

impl DryRunHotkeyListener {
    pub fn new(grabs: GrabTable, sender: UnboundedSender<ActionId>) -> Self {
        Self { grabs, sender }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - введите сочетание (например <Super>e) и нажмите Enter");

        // Блокирующее чтение stdin живёт в отдельном потоке, чтобы abort задачи
        // и остановка runtime не ждали следующей строки
        let (line_sender, lines) = unbounded_channel();
        std::thread::Builder::new()
            .name("dry-run-stdin".to_string())
            .spawn(move || read_stdin(line_sender))?;

        self.process_lines(lines).await;
        Ok(())
    }

    async fn process_lines(&self, mut lines: UnboundedReceiver<String>) {
        while let Some(line) = lines.recv().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.resolve(line) {
                Some(action) => {
                    info!("Dry-run: срабатывание {} ({})", line, action);
                    if self.sender.send(action).is_err() {
                        return;
                    }
                }
                None => warn!("Dry-run: сочетание '{}' не захвачено", line),
            }
        }

        info!("Dry-run: stdin закрыт, слушатель остановлен");
    }

    fn resolve(&self, text: &str) -> Option<ActionId> {
        let accelerator = Accelerator::parse(text).ok()?;
        self.grabs.lookup_accelerator(&accelerator)
    }
}

fn read_stdin(lines: UnboundedSender<String>) {
    for line in std::io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                if lines.send(line).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!("Dry-run: ошибка чтения stdin: {}", e);
                return;
            }
        }
    }
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for DryRunHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::hotkeys::HotkeyBackend;

    #[test]
    fn test_resolve_typed_accelerator() {
        let mut grabs = GrabTable::new();
        let id = grabs.grab("<Super>t").unwrap();
        let (sender, _receiver) = unbounded_channel();
        let listener = DryRunHotkeyListener::new(grabs, sender);

        assert_eq!(listener.resolve("super+t"), Some(id));
        assert_eq!(listener.resolve("<Super>y"), None);
        assert_eq!(listener.resolve("garbage<"), None);
    }

    #[tokio::test]
    async fn test_lines_fire_grabbed_actions_until_input_ends() {
        let mut grabs = GrabTable::new();
        let id = grabs.grab("<Super>t").unwrap();
        let (sender, mut activations) = unbounded_channel();
        let listener = DryRunHotkeyListener::new(grabs, sender);

        let (line_sender, lines) = unbounded_channel();
        line_sender.send("  <Super>t ".to_string()).unwrap();
        line_sender.send(String::new()).unwrap();
        line_sender.send("<Super>y".to_string()).unwrap();
        drop(line_sender);

        listener.process_lines(lines).await;
        assert_eq!(activations.recv().await, Some(id));
        drop(listener);
        assert_eq!(activations.recv().await, None);
    }

    #[tokio::test]
    async fn test_waiting_listener_can_be_aborted() {
        let (sender, _activations) = unbounded_channel();
        let listener = DryRunHotkeyListener::new(GrabTable::new(), sender);
        let (_line_sender, lines) = unbounded_channel::<String>();

        let handle = tokio::spawn(async move { listener.process_lines(lines).await });
        tokio::task::yield_now().await;
        handle.abort();

        let result = tokio::time::timeout(std::time::Duration::from_secs(1), handle).await;
        assert!(result.expect("abort должен завершить задачу").unwrap_err().is_cancelled());
    }
}
