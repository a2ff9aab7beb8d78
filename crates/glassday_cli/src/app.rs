//! Interactive loop driving one day session from line input.

use crate::commands::{parse, Command, HELP};
use crate::render::render;
use glassday_core::{
    Clock, DayRepository, DayStateMachine, DayView, ItemId, ResetOutcome, Stage,
};
use std::io::{self, BufRead, Write};

/// Reads commands until `quit` or end of input.
pub fn run<R, C>(
    machine: &mut DayStateMachine<R, C>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()>
where
    R: DayRepository,
    C: Clock,
{
    write!(output, "{}", render(&machine.view()))?;

    loop {
        write!(output, "{}> ", machine.stage())?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(());
        };

        // Any input dismisses the explanation overlay.
        if machine.stage() == Stage::Explain && !matches!(parse(&line), Ok(Command::Quit)) {
            if let Err(err) = machine.dismiss_explanation() {
                writeln!(output, "{err}")?;
            }
            write!(output, "{}", render(&machine.view()))?;
            continue;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Help => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            Command::Reset => {
                write!(output, "Are you sure? This will clear today's plan. [y/N] ")?;
                output.flush()?;
                let answer = read_line(input)?.unwrap_or_default();
                match machine.reset(|| is_yes(&answer)) {
                    Ok(ResetOutcome::Declined) => writeln!(output, "Kept today's plan.")?,
                    Ok(ResetOutcome::Cleared) => {}
                    Err(err) => writeln!(output, "{err}")?,
                }
            }
            other => {
                if let Some(message) = apply(machine, other) {
                    writeln!(output, "{message}")?;
                }
            }
        }

        write!(output, "{}", render(&machine.view()))?;
    }
}

/// Applies one non-interactive command; returns a message for the user.
fn apply<R: DayRepository, C: Clock>(
    machine: &mut DayStateMachine<R, C>,
    command: Command,
) -> Option<String> {
    let view = machine.view();
    match command {
        Command::Add(text) => machine
            .add_item(&text)
            .is_none()
            .then(|| "Nothing to add here.".to_string()),
        Command::Recent(n) => {
            let DayView::Dump(dump) = view else {
                return Some(unavailable(machine.stage()));
            };
            let Some(text) = dump.recents.get(n - 1) else {
                return Some(no_item(n));
            };
            machine.add_item(text);
            None
        }
        Command::Done => machine.finish_dump().err().map(|err| err.to_string()),
        Command::Glass(n) => {
            let DayView::Select(select) = view else {
                return Some(unavailable(machine.stage()));
            };
            let Some(item) = select.items.get(n - 1) else {
                return Some(no_item(n));
            };
            machine.toggle_type(&item.id);
            None
        }
        Command::Continue => machine.finish_selection().err().map(|err| err.to_string()),
        Command::Dismiss => machine
            .dismiss_explanation()
            .err()
            .map(|err| err.to_string()),
        Command::Energy(energy) => {
            (!machine.set_energy(energy)).then(|| unavailable(machine.stage()))
        }
        Command::Order(positions) => {
            if machine.stage() != Stage::Balance {
                return Some(unavailable(machine.stage()));
            }
            let glass = machine.glass_entries();
            let ids: Option<Vec<ItemId>> = positions
                .iter()
                .map(|n| glass.get(n - 1).map(|entry| entry.item.id.clone()))
                .collect();
            let accepted = ids.is_some_and(|ids| machine.reorder(&ids));
            (!accepted).then(|| "Order must list every glass item exactly once.".to_string())
        }
        Command::Action(n, text) => {
            if machine.stage() != Stage::Balance {
                return Some(unavailable(machine.stage()));
            }
            let Some(entry) = machine.glass_entries().into_iter().nth(n - 1) else {
                return Some(no_item(n));
            };
            (!machine.set_action(&entry.item.id, &text))
                .then(|| "Postponed items cannot take an action; move it higher.".to_string())
        }
        Command::Lock => machine.lock().err().map(|err| err.to_string()),
        Command::Check(n) => {
            let DayView::Locked(locked) = view else {
                return Some(unavailable(machine.stage()));
            };
            let Some(item) = locked.carried.get(n - 1) else {
                return Some(no_item(n));
            };
            machine.toggle_handled(&item.id);
            None
        }
        Command::Show | Command::Help | Command::Quit | Command::Reset => None,
    }
}

fn unavailable(stage: Stage) -> String {
    format!("Not available while in `{stage}`.")
}

fn no_item(n: usize) -> String {
    format!("No item {n}.")
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::run;
    use glassday_core::{
        Clock, DayStateMachine, FixedClock, ItemStore, KvDayRepository, MemoryKvStore,
        RandomLayout, SequentialIdGenerator, Stage, SystemClock, DAY_RECORD_KEY,
    };
    use std::io::Cursor;

    type Machine = DayStateMachine<KvDayRepository<MemoryKvStore>, FixedClock>;

    fn machine() -> Machine {
        DayStateMachine::start(
            KvDayRepository::new(MemoryKvStore::new()),
            FixedClock(SystemClock.today()),
            ItemStore::new(
                Box::new(SequentialIdGenerator::new()),
                Box::new(RandomLayout::seeded(2)),
            ),
        )
    }

    fn drive(machine: &mut Machine, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run(machine, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn script_walks_the_whole_day() {
        let mut machine = machine();
        let out = drive(
            &mut machine,
            "add Finish report\nadd Laundry\ndone\nglass 1\ncontinue\n\n\
             lock\nenergy low\naction 1 Write intro\nlock\ncheck 1\nquit\n",
        );

        assert_eq!(machine.stage(), Stage::Locked);
        assert!(out.contains("Glass balls must not be dropped"));
        assert!(out.contains("select an energy level before locking"));
        assert!(out.contains("1. (x) Finish report"));
        assert!(machine.items()[0].handled);
    }

    #[test]
    fn reset_requires_yes() {
        let mut machine = machine();
        drive(
            &mut machine,
            "add A\ndone\ncontinue\ndismiss\nenergy high\nlock\nreset\nn\n",
        );
        assert_eq!(machine.stage(), Stage::Locked);

        let out = drive(&mut machine, "reset\ny\n");
        assert_eq!(machine.stage(), Stage::Dump);
        assert!(out.contains("What's on your mind?"));
        assert!(!machine.repository().store().contains_key(DAY_RECORD_KEY));
    }

    #[test]
    fn order_must_be_a_full_permutation() {
        let mut machine = machine();
        let out = drive(
            &mut machine,
            "add A\nadd B\ndone\nglass 1\nglass 2\ncontinue\nx\nenergy medium\norder 2\norder 2 1\n",
        );
        assert!(out.contains("Order must list every glass item exactly once."));
        assert_eq!(machine.glass_entries()[0].item.text, "B");
    }

    #[test]
    fn balance_commands_are_refused_in_other_stages() {
        let mut machine = machine();
        let out = drive(&mut machine, "add A\norder 1\naction 1 Go\n");
        assert_eq!(out.matches("Not available while in `dump`.").count(), 2);
        assert!(!out.contains("Order must list"));
        assert!(!out.contains("Postponed items"));
    }

    #[test]
    fn out_of_range_numbers_are_reported() {
        let mut machine = machine();
        let out = drive(&mut machine, "add A\nrecent 3\ndone\nglass 4\n");
        assert!(out.contains("No item 3."));
        assert!(out.contains("No item 4."));
        assert_eq!(machine.stage(), Stage::Select);
    }
}
