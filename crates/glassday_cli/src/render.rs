//! Plain-text rendering of the five day views.

use glassday_core::{BalanceView, DayView, DumpView, GlassStatus, Item, LockedView, SelectView};
use std::fmt::Write as _;

pub fn render(view: &DayView) -> String {
    match view {
        DayView::Dump(view) => render_dump(view),
        DayView::Select(view) => render_select(view),
        DayView::Explain => render_explain(),
        DayView::Balance(view) => render_balance(view),
        DayView::Locked(view) => render_locked(view),
    }
}

fn render_dump(view: &DumpView) -> String {
    let mut out = String::from("What's on your mind?\n");
    for item in view.items.iter() {
        let _ = writeln!(out, "  · {}", item.text);
    }
    if !view.recents.is_empty() {
        out.push_str("Yesterday you held (recent <n> to add again):\n");
        for (n, text) in view.recents.iter().enumerate() {
            let _ = writeln!(out, "  {}. {text}", n + 1);
        }
    }
    if view.can_finish {
        out.push_str("(done) when everything is out of your head\n");
    }
    out
}

fn render_select(view: &SelectView) -> String {
    let mut out = String::from("Which are glass balls?\n");
    for (n, item) in view.items.iter().enumerate() {
        let marker = if item.is_glass() { "[glass]" } else { "       " };
        let _ = writeln!(out, "  {}. {marker} {}", n + 1, item.text);
    }
    if view.too_much_glass {
        out.push_str("That's a lot of glass. Consider dropping some.\n");
    }
    out
}

fn render_explain() -> String {
    "Glass balls must not be dropped. If they fall, they shatter.\n\
     Rubber balls can bounce. You can pick them up later.\n\
     (press enter to continue)\n"
        .to_string()
}

fn render_balance(view: &BalanceView) -> String {
    let mut out = String::new();
    match view.energy {
        Some(energy) => {
            let _ = writeln!(out, "Energy: {}", energy.as_str());
        }
        None => out.push_str(
            "How much energy do you realistically have today? (energy low|medium|high)\n",
        ),
    }

    for entry in &view.glass {
        let _ = write!(out, "  {}. {}", entry.rank + 1, entry.item.text);
        match entry.status {
            GlassStatus::Active => {
                let action = entry
                    .item
                    .action
                    .as_deref()
                    .filter(|action| !action.is_empty())
                    .unwrap_or("(no action yet)");
                let _ = writeln!(out, " -> {action}");
            }
            GlassStatus::Postponed => out.push_str(" [postponed: move it higher to enable]\n"),
        }
    }

    let _ = writeln!(out, "Rubber container ({})", view.rubber.len());
    for item in &view.rubber {
        let _ = writeln!(out, "  ~ {}", item.text);
    }
    if view.can_lock {
        out.push_str("(lock) when the plan looks right\n");
    }
    out
}

fn render_locked(view: &LockedView) -> String {
    let mut out = String::from("Today is locked. Focus only on what matters.\n");
    if view.carried.is_empty() {
        out.push_str("No glass balls actively carried today. Rest well.\n");
    }
    for (n, item) in view.carried.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} {}", n + 1, check_box(item), item.text);
        let _ = writeln!(out, "       {}", item.action.as_deref().unwrap_or(""));
    }
    out
}

fn check_box(item: &Item) -> &'static str {
    if item.handled {
        "(x)"
    } else {
        "( )"
    }
}
