use anyhow::{Context, bail};
use mathionary_core::{Operator, TileIndex};

pub const HELP: &str = "\
<n>        pick or drop tile n
s          show the answers for the current pick
o <op>     switch operator (+ - * / or its name)
r          deal a new deck
h          this help
q          quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Click(TileIndex),
    Reveal,
    Operator(Operator),
    Reset,
    Help,
    Quit,
}

pub fn parse(line: &str) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        bail!("Type a tile number, or h for help");
    };

    let command = match head {
        "s" | "solve" => Command::Reveal,
        "r" | "reset" => Command::Reset,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "o" | "op" => {
            let name = words.next().context("Which operator? e.g. o +")?;
            Command::Operator(name.parse()?)
        }
        index => Command::Click(
            index
                .parse()
                .with_context(|| format!("Unknown command '{index}'"))?,
        ),
    };

    if words.next().is_some() {
        bail!("Too many arguments for '{head}'");
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse("7").unwrap(), Command::Click(7));
        assert_eq!(parse("  s ").unwrap(), Command::Reveal);
        assert_eq!(parse("o ÷").unwrap(), Command::Operator(Operator::Divide));
        assert_eq!(parse("op multiplication").unwrap(), Command::Operator(Operator::Multiply));
        assert_eq!(parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("o").is_err());
        assert!(parse("o %").is_err());
        assert!(parse("seven").is_err());
        assert!(parse("-1").is_err());
        assert!(parse("3 4").is_err());
    }
}
