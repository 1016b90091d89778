//! End-to-end tests for the shell loop.
//!
//! Commands are parsed exactly as the binary parses stdin lines and fed
//! through the shell's event channel.

use baseshell::app::{Shell, ShellCommand, ShellEvent, parse_command};
use baseshell::menu::{MenuKey, MenuInteractionState};
use baseshell::{MenuAction, Outcome};
use baseshell_config::{JsonFileStore, KeyBinding, MemoryStore, ShellConfig};
use baseshell_keybindings::InProcessHost;
use std::sync::Arc;
use tempfile::TempDir;

/// Feed `script` to `shell` the way the binary does, then drain the queue.
fn feed<S, H>(shell: &mut Shell<S, H>, host: &InProcessHost, script: &str) -> Vec<Outcome>
where
    S: baseshell_config::KeyValueStore,
    H: baseshell_keybindings::ShortcutHost,
{
    let tx = shell.sender();
    for line in script.lines() {
        match parse_command(line).unwrap() {
            Some(ShellCommand::Event(event)) => tx.send(event).unwrap(),
            Some(ShellCommand::PressShortcut(combo)) => {
                host.trigger(&combo);
            }
            None => {}
        }
    }
    shell.process_pending().unwrap()
}

fn open(key: MenuKey) -> MenuInteractionState {
    MenuInteractionState {
        open_menu: Some(key),
        is_active: true,
    }
}

#[tokio::test(start_paused = true)]
async fn menu_exclusivity_and_toggle() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut shell = Shell::new(ShellConfig::default(), store, Arc::clone(&host));
    shell.mount().await;

    feed(&mut shell, &host, "click file\nclick edit");
    assert_eq!(shell.menu().state(), open(MenuKey::Edit));

    feed(&mut shell, &host, "click edit");
    assert_eq!(shell.menu().state(), MenuInteractionState::default());

    feed(&mut shell, &host, "click file\nclick file");
    assert_eq!(shell.menu().state(), MenuInteractionState::default());

    shell.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn hover_switches_only_after_click() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut shell = Shell::new(ShellConfig::default(), store, Arc::clone(&host));
    shell.mount().await;

    feed(&mut shell, &host, "hover edit");
    assert_eq!(shell.menu().state(), MenuInteractionState::default());

    feed(&mut shell, &host, "click file\nhover edit\nhover help");
    assert_eq!(shell.menu().state(), open(MenuKey::Help));

    feed(&mut shell, &host, "outside");
    assert_eq!(shell.menu().state(), MenuInteractionState::default());
    assert_eq!(shell.pointer_listeners().active_count(), 0);

    shell.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn submenu_selection_dispatches_once() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut shell = Shell::new(ShellConfig::default(), store, Arc::clone(&host));
    shell.mount().await;

    let outcomes = feed(&mut shell, &host, "click file\nsubmenu saveAs\nselect saveAsSQL");
    assert_eq!(shell.performed(), [MenuAction::SaveAsSql]);
    assert_eq!(shell.menu().state(), MenuInteractionState::default());
    assert!(outcomes.contains(&Outcome::Output("action: saveAsSQL".to_string())));

    shell.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn remount_keeps_one_shortcut_grab() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut config = ShellConfig::default();
    config.global_shortcuts.push(KeyBinding {
        key: "Ctrl+Alt+R".to_string(),
        action: "resetLayout".to_string(),
    });
    config.global_shortcuts.push(KeyBinding {
        key: "Ctrl+".to_string(),
        action: "about".to_string(),
    });
    let mut shell = Shell::new(config, store, Arc::clone(&host));

    // Mounted twice without an unmount in between
    shell.mount().await;
    shell.mount().await;
    assert_eq!(host.registered_count(), 2);
    assert_eq!(shell.shortcuts().active_count(), 2);

    feed(&mut shell, &host, "resize h 30 60 10\nshortcut Ctrl+Alt+R");
    assert_eq!(shell.performed(), [MenuAction::ResetLayout]);
    assert_eq!(shell.layout().layout().horizontal, [10.0, 80.0, 10.0]);

    shell.shutdown().await;
    assert_eq!(host.registered_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn remount_keeps_unsaved_layout() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut shell = Shell::new(ShellConfig::default(), Arc::clone(&store), Arc::clone(&host));
    shell.mount().await;

    feed(&mut shell, &host, "resize v 70 30");
    assert!(shell.layout().has_pending_save());
    shell.mount().await;
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;

    assert_eq!(shell.layout().layout().vertical, [70.0, 30.0]);
    assert_eq!(
        shell.layout().surface().axis_sizes(baseshell_config::Axis::Vertical),
        Some(vec![70.0, 30.0])
    );
    assert_eq!(store.peek("layout.vertical"), Some(serde_json::json!([70.0, 30.0])));

    // Unmounted panels get the in-memory sizes back on the next mount
    feed(&mut shell, &host, "unmount
mount");
    assert_eq!(
        shell.layout().surface().axis_sizes(baseshell_config::Axis::Vertical),
        Some(vec![70.0, 30.0])
    );

    shell.shutdown().await;
}

#[tokio::test]
async fn quit_flushes_layout_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseshell.config");
    let host = Arc::new(InProcessHost::new());

    {
        let store = Arc::new(JsonFileStore::open(&path).await);
        let mut shell = Shell::new(ShellConfig::default(), store, Arc::clone(&host));
        shell.mount().await;

        let tx = shell.sender();
        tx.send(ShellEvent::Resize {
            axis: baseshell_config::Axis::Horizontal,
            sizes: vec![25.0, 55.0, 20.0],
        })
        .unwrap();
        tx.send(ShellEvent::Exit).unwrap();

        let mut out = Vec::new();
        shell.run(&mut out, None).await.unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["layout.horizontal"], serde_json::json!([25.0, 55.0, 20.0]));
    assert_eq!(value["layout.vertical"], serde_json::json!([40.0, 60.0]));
}

#[tokio::test(start_paused = true)]
async fn layout_report_uses_two_decimal_labels() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InProcessHost::new());
    let mut shell = Shell::new(ShellConfig::default(), store, Arc::clone(&host));
    shell.mount().await;

    let outcomes = feed(&mut shell, &host, "collapse left\nlayout");
    assert_eq!(
        outcomes.last(),
        Some(&Outcome::Output(
            "H=[3.00% 87.00% 10.00%] V=[40.00% 60.00%]".to_string()
        ))
    );

    shell.shutdown().await;
}
