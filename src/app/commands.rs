//! Line commands read by the headless binary.

use super::events::{ReportKind, ShellEvent};
use crate::menu::{MenuEvent, MenuKey, PointerPath};
use anyhow::{Context, Result, anyhow, bail};
use baseshell_config::{Axis, PaneId};
use baseshell_keybindings::{KeyCombo, parse_key_combo};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Feed an event to the shell loop
    Event(ShellEvent),
    /// Press a key combo on the shortcut host
    PressShortcut(KeyCombo),
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let event = match verb.as_str() {
        "resize" => {
            let (axis, sizes) = args
                .split_first()
                .ok_or_else(|| anyhow!("usage: resize <h|v> <size>..."))?;
            let axis = Axis::parse(axis).ok_or_else(|| anyhow!("unknown axis '{}'", axis))?;
            let sizes = sizes
                .iter()
                .map(|s| s.parse::<f32>().with_context(|| format!("invalid size '{}'", s)))
                .collect::<Result<Vec<_>>>()?;
            ShellEvent::Resize { axis, sizes }
        }
        "click" => ShellEvent::Menu(MenuEvent::Click(menu_key(&args)?)),
        "hover" => ShellEvent::Menu(MenuEvent::Hover(menu_key(&args)?)),
        "outside" => ShellEvent::Menu(MenuEvent::PointerDown(PointerPath::content())),
        "select" => ShellEvent::Menu(MenuEvent::Select(single(&args, "select <item>")?.to_string())),
        "submenu" => ShellEvent::Menu(MenuEvent::SubmenuOpen(
            single(&args, "submenu <id>")?.to_string(),
        )),
        "shortcut" => {
            let combo = single(&args, "shortcut <combo>")?;
            return Ok(Some(ShellCommand::PressShortcut(parse_key_combo(combo)?)));
        }
        "collapse" => {
            let name = single(&args, "collapse <left|right>")?;
            let pane = PaneId::parse(name).ok_or_else(|| anyhow!("unknown pane '{}'", name))?;
            ShellEvent::ToggleCollapse(pane)
        }
        "reset" => ShellEvent::Action(crate::menu::MenuAction::ResetLayout),
        "mount" => ShellEvent::PanelsMounted,
        "unmount" => ShellEvent::PanelsUnmounted,
        "layout" => ShellEvent::Report(ReportKind::Layout),
        "menu" => ShellEvent::Report(ReportKind::Menu),
        "quit" | "exit" => ShellEvent::Exit,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(ShellCommand::Event(event)))
}

fn single<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    match args {
        [one] => Ok(*one),
        _ => bail!("usage: {}", usage),
    }
}

fn menu_key(args: &[&str]) -> Result<MenuKey> {
    let name = single(args, "<file|edit|view|help>")?;
    MenuKey::parse(name).ok_or_else(|| anyhow!("unknown menu '{}'", name))
}
