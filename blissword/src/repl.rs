// Line-oriented edit loop over an `EditSession`.
//
// One command per line; the buffer is printed after every edit.

use anyhow::{anyhow, bail, Result};
use blissword_core::EditSession;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const HELP: &str = "\
commands:
  add <id>                 append a dictionary symbol
  add <builder> [gloss]    append a symbol given as a builder string
  left | right             move the caret
  del                      delete the item at the caret
  clear                    empty the buffer
  ind <id>                 add or replace the indicator
  unind                    remove the indicator
  mod <id> [after]         add a modifier (before the word unless `after`)
  unmod                    remove the most recent modifier
  show                     print the buffer
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    AppendId(u32),
    AppendBuilder { text: String, gloss: String },
    Left,
    Right,
    Delete,
    Clear,
    Indicator(u32),
    RemoveIndicator,
    Modifier { id: u32, prepend: bool },
    RemoveModifier,
    Show,
    Help,
    Quit,
}

impl FromStr for EditCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            bail!("empty command");
        };
        let rest: Vec<&str> = words.collect();
        let id_arg = |what: &str| -> Result<u32> {
            rest.first()
                .ok_or_else(|| anyhow!("{} needs an identifier", what))?
                .parse()
                .map_err(|_| anyhow!("{} needs a numeric identifier", what))
        };

        Ok(match head {
            "add" => {
                let arg = rest.first().ok_or_else(|| anyhow!("add needs a symbol"))?;
                match arg.parse::<u32>() {
                    Ok(id) => EditCommand::AppendId(id),
                    Err(_) => EditCommand::AppendBuilder {
                        text: arg.to_string(),
                        gloss: rest[1..].join(" "),
                    },
                }
            }
            "left" => EditCommand::Left,
            "right" => EditCommand::Right,
            "del" => EditCommand::Delete,
            "clear" => EditCommand::Clear,
            "ind" => EditCommand::Indicator(id_arg("ind")?),
            "unind" => EditCommand::RemoveIndicator,
            "mod" => EditCommand::Modifier {
                id: id_arg("mod")?,
                prepend: rest.get(1) != Some(&"after"),
            },
            "unmod" => EditCommand::RemoveModifier,
            "show" => EditCommand::Show,
            "help" | "?" => EditCommand::Help,
            "quit" | "exit" => EditCommand::Quit,
            other => bail!("unknown command {:?}, try `help`", other),
        })
    }
}

/// Apply one command. Returns false when the session should end.
pub fn apply(session: &mut EditSession, command: EditCommand) -> Result<bool> {
    match command {
        EditCommand::AppendId(id) => {
            if !session.append_id(id) {
                bail!("{} is not in the dictionary", id);
            }
        }
        EditCommand::AppendBuilder { text, gloss } => {
            let symbol = session.engine().decode_default(&text);
            if symbol.is_empty() {
                bail!("cannot decode {:?}", text);
            }
            session.append(&text, &gloss, symbol);
        }
        EditCommand::Left => session.move_caret_backward(),
        EditCommand::Right => session.move_caret_forward(),
        EditCommand::Delete => session.delete_at_caret(),
        EditCommand::Clear => session.clear_all(),
        EditCommand::Indicator(id) => {
            if !session.can_add_indicator() {
                bail!("nothing to attach an indicator to");
            }
            session.add_or_replace_indicator(id);
        }
        EditCommand::RemoveIndicator => {
            if !session.can_remove_indicator() {
                bail!("the selected word has no indicator");
            }
            session.remove_indicator();
        }
        EditCommand::Modifier { id, prepend } => {
            if !session.add_modifier_id(id, prepend) {
                bail!("{} is not in the dictionary", id);
            }
        }
        EditCommand::RemoveModifier => {
            if !session.can_remove_modifier() {
                bail!("the selected word has no modifiers");
            }
            session.remove_last_modifier();
        }
        EditCommand::Show => {}
        EditCommand::Help => println!("{}", HELP),
        EditCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn render(session: &EditSession) -> String {
    let buffer = session.buffer();
    if buffer.is_empty() {
        return "  (empty)".to_string();
    }
    let mut out = String::new();
    for (i, item) in buffer.items().iter().enumerate() {
        let marker = if buffer.caret() == Some(i) { '>' } else { ' ' };
        out.push_str(&format!("{} {}. {}  {}\n", marker, i, item.gloss, item.symbol));
    }
    match session.builder_string() {
        Ok(text) => out.push_str(&format!("  = {}", text)),
        Err(e) => out.push_str(&format!("  = ({})", e)),
    }
    out
}

pub fn run(mut session: EditSession) -> Result<()> {
    println!("blissword edit session, `help` for commands");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match line.parse::<EditCommand>().and_then(|cmd| apply(&mut session, cmd)) {
                Ok(false) => break,
                Ok(true) => println!("{}", render(&session)),
                Err(e) => println!("  ! {}", e),
            }
        }
        print!("> ");
        stdout.flush()?;
    }
    tracing::debug!(items = session.buffer().len(), "edit session ended");
    Ok(())
}
