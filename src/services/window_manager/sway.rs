use crate::error::Result;
use crate::events::{WindowGeometry, WindowScope, WindowSnapshot};
use crate::ror_error;
use serde_json::Value;
use tracing::debug;

use super::r#trait::{run_tool, WindowManager};

/// Номер "рабочего стола" для окон в scratchpad. Обычные столы нумеруются
/// id узла дерева: поле `num` у именованных столов тоже равно -1.
const SCRATCHPAD: i32 = -1;

/// Sway через `swaymsg`. Порядок MRU восстанавливается по массивам `focus` дерева.
pub struct SwayWindowManager;

impl SwayWindowManager {
    pub fn new() -> Self {
        Self
    }

    fn command(&self, criteria: &WindowSnapshot, command: &str) -> Result<()> {
        let full = format!("[con_id={}] {}", criteria.id.0, command);
        run_tool("swaymsg", &[&full]).map(|_| ())
    }

    fn tree(&self) -> Result<Value> {
        let stdout = run_tool("swaymsg", &["-t", "get_tree", "-r"])?;
        serde_json::from_str(&stdout).map_err(|e| ror_error!(window, "некорректный ответ swaymsg: {}", e))
    }

    fn focused_workspace_name(&self) -> Result<String> {
        let stdout = run_tool("swaymsg", &["-t", "get_workspaces", "-r"])?;
        let workspaces: Value = serde_json::from_str(&stdout)
            .map_err(|e| ror_error!(window, "некорректный ответ swaymsg: {}", e))?;

        workspaces
            .as_array()
            .into_iter()
            .flatten()
            .find(|ws| ws["focused"].as_bool() == Some(true))
            .and_then(|ws| ws["name"].as_str())
            .map(str::to_string)
            .ok_or_else(|| ror_error!(window, "активный рабочий стол в Sway не найден"))
    }
}

impl WindowManager for SwayWindowManager {
    fn name(&self) -> &'static str {
        "sway"
    }

    fn list_windows(&self, scope: WindowScope) -> Result<Vec<WindowSnapshot>> {
        let tree = self.tree()?;
        let (windows, active_workspace) = windows_from_tree(&tree);

        Ok(match (scope, active_workspace) {
            (WindowScope::ActiveWorkspace, Some(active)) => windows
                .into_iter()
                .filter(|w| w.workspace == active)
                .collect(),
            _ => windows,
        })
    }

    fn focus(&self, window: &WindowSnapshot) -> Result<()> {
        if window.workspace == SCRATCHPAD {
            self.command(window, "scratchpad show")
        } else {
            self.command(window, "focus")
        }
    }

    fn minimize(&self, window: &WindowSnapshot) -> Result<()> {
        self.command(window, "move scratchpad")
    }

    fn move_to_active_workspace(&self, window: &WindowSnapshot) -> Result<()> {
        let workspace = self.focused_workspace_name()?;
        self.command(window, &format!("move container to workspace \"{}\"", workspace))
    }

    fn center_pointer_on(&self, window: &WindowSnapshot) -> Result<()> {
        let geometry = window
            .geometry
            .ok_or_else(|| ror_error!(window, "у окна {} нет геометрии", window))?;
        let (x, y) = geometry.center();
        run_tool("swaymsg", &[&format!("seat seat0 cursor set {} {}", x, y)]).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    monitor: i32,
    workspace: i32,
    scratchpad: bool,
}

impl Placement {
    fn workspace_id(&self) -> i32 {
        if self.scratchpad {
            SCRATCHPAD
        } else {
            self.workspace
        }
    }
}

/// Разобрать дерево `get_tree`: окна в порядке MRU и номер активного рабочего стола
fn windows_from_tree(tree: &Value) -> (Vec<WindowSnapshot>, Option<i32>) {
    let mut windows = Vec::new();
    let mut active_workspace = None;
    let placement = Placement { monitor: -1, workspace: SCRATCHPAD, scratchpad: true };
    collect(tree, placement, &mut windows, &mut active_workspace);
    debug!("Sway: найдено {} окон, активный стол {:?}", windows.len(), active_workspace);
    (windows, active_workspace)
}

fn collect(
    node: &Value,
    mut placement: Placement,
    windows: &mut Vec<WindowSnapshot>,
    active_workspace: &mut Option<i32>,
) {
    match node["type"].as_str() {
        Some("output") => {
            placement.monitor = node["id"].as_i64().unwrap_or(-1) as i32;
        }
        Some("workspace") => {
            placement.scratchpad = node["name"].as_str() == Some("__i3_scratch");
            placement.workspace = node["id"].as_i64().unwrap_or(SCRATCHPAD as i64) as i32;
        }
        _ => {}
    }

    let focused = node["focused"].as_bool().unwrap_or(false);
    if focused && !placement.scratchpad {
        *active_workspace = Some(placement.workspace_id());
    }

    let children = ordered_children(node);
    if children.is_empty() && is_window(node) {
        windows.push(snapshot(node, placement, focused));
        return;
    }

    for child in children {
        collect(child, placement, windows, active_workspace);
    }
}

fn is_window(node: &Value) -> bool {
    matches!(node["type"].as_str(), Some("con") | Some("floating_con"))
        && (node["pid"].is_number() || node["app_id"].is_string() || node["window_properties"].is_object())
}

fn snapshot(node: &Value, placement: Placement, focused: bool) -> WindowSnapshot {
    let class = node["app_id"]
        .as_str()
        .or_else(|| node["window_properties"]["class"].as_str())
        .unwrap_or("");
    let title = node["name"].as_str().unwrap_or("");
    let id = node["id"].as_u64().unwrap_or(0);

    let mut window = WindowSnapshot::new(id, title)
        .with_class(class)
        .with_focus(focused)
        .on_monitor(placement.monitor)
        .on_workspace(placement.workspace_id());

    let rect = &node["rect"];
    if let (Some(x), Some(y), Some(width), Some(height)) = (
        rect["x"].as_i64(),
        rect["y"].as_i64(),
        rect["width"].as_u64(),
        rect["height"].as_u64(),
    ) {
        window = window.with_geometry(WindowGeometry {
            x: x as i32,
            y: y as i32,
            width: width as u32,
            height: height as u32,
        });
    }

    window
}

/// Дочерние узлы (`nodes` и `floating_nodes`) в порядке массива `focus`;
/// узлы, которых нет в `focus`, идут в конце в исходном порядке
fn ordered_children(node: &Value) -> Vec<&Value> {
    let mut children: Vec<&Value> = ["nodes", "floating_nodes"]
        .iter()
        .filter_map(|key| node[*key].as_array())
        .flatten()
        .collect();

    let focus: Vec<u64> = node["focus"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_u64).collect())
        .unwrap_or_default();

    children.sort_by_key(|child| {
        let id = child["id"].as_u64().unwrap_or(0);
        focus.iter().position(|f| *f == id).unwrap_or(usize::MAX)
    });
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn window(id: u64, name: &str, app_id: &str, focused: bool, x: i64, width: i64) -> Value {
        json!({
            "id": id, "type": "con", "name": name, "app_id": app_id,
            "pid": id, "focused": focused,
            "nodes": [], "floating_nodes": [], "focus": [],
            "rect": {"x": x, "y": 0, "width": width, "height": 1080}
        })
    }

    fn workspace(id: u64, name: &str, num: i64, focus: &[u64], nodes: Vec<Value>) -> Value {
        json!({
            "id": id, "type": "workspace", "name": name, "num": num, "focused": false,
            "focus": focus, "nodes": nodes, "floating_nodes": []
        })
    }

    fn output(id: u64, name: &str, focus: &[u64], nodes: Vec<Value>) -> Value {
        json!({
            "id": id, "type": "output", "name": name, "focused": false,
            "focus": focus, "nodes": nodes
        })
    }

    fn root(focus: &[u64], nodes: Vec<Value>) -> Value {
        json!({
            "id": 1, "type": "root", "name": "root", "focused": false,
            "focus": focus, "nodes": nodes
        })
    }

    fn sample_tree() -> Value {
        let mut hidden = window(21, "Hidden notes", "notes", false, 0, 100);
        hidden["type"] = json!("floating_con");
        let mut scratch = workspace(20, "__i3_scratch", -1, &[21], Vec::new());
        scratch["floating_nodes"] = json!([hidden]);

        let mut firefox = window(50, "Mozilla Firefox", "", false, 0, 960);
        firefox["app_id"] = Value::Null;
        firefox["window_properties"] = json!({"class": "firefox"});

        root(
            &[3, 2],
            vec![
                output(2, "__i3", &[20], vec![scratch]),
                output(
                    3,
                    "eDP-1",
                    &[5, 4],
                    vec![
                        workspace(4, "1", 1, &[40], vec![window(40, "Old terminal", "kitty", false, 0, 800)]),
                        workspace(
                            5,
                            "2",
                            2,
                            &[51, 50],
                            vec![firefox, window(51, "New terminal", "kitty", true, 960, 960)],
                        ),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_tree_is_flattened_in_focus_order() {
        let (windows, active) = windows_from_tree(&sample_tree());
        let ids: Vec<u64> = windows.iter().map(|w| w.id.0).collect();

        assert_eq!(ids, vec![51, 50, 40, 21]);
        assert_eq!(active, Some(5));
    }

    #[test]
    fn test_window_fields() {
        let (windows, _) = windows_from_tree(&sample_tree());

        let terminal = &windows[0];
        assert!(terminal.focused);
        assert_eq!(terminal.class, "kitty");
        assert_eq!(terminal.monitor, 3);
        assert_eq!(terminal.workspace, 5);
        assert_eq!(terminal.geometry.map(|g| g.center()), Some((1440, 540)));

        let firefox = &windows[1];
        assert_eq!(firefox.class, "firefox");
        assert!(!firefox.focused);

        let hidden = &windows[3];
        assert_eq!(hidden.workspace, SCRATCHPAD);
    }

    #[test]
    fn test_named_workspaces_are_distinct_and_not_scratchpad() {
        // Sway отдаёт num = -1 для столов, имя которых не начинается с цифры
        let tree = root(
            &[3],
            vec![output(
                3,
                "eDP-1",
                &[7, 6],
                vec![
                    workspace(6, "mail", -1, &[40], vec![window(40, "Inbox", "thunderbird", false, 0, 800)]),
                    workspace(7, "web", -1, &[50], vec![window(50, "Browser", "firefox", true, 0, 800)]),
                ],
            )],
        );

        let (windows, active) = windows_from_tree(&tree);
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.workspace != SCRATCHPAD));
        assert_eq!(windows[0].workspace, 7);
        assert_eq!(windows[1].workspace, 6);
        assert_eq!(active, Some(7));
    }
}
