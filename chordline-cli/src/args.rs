use std::path::PathBuf;

pub const USAGE: &str = "\
usage: chordline [-v|--verbose] <command>

commands:
  schedule <project.json>           print the trigger schedule of one cycle
  play <project.json> [--repeat]    play the project through the console
  palette [octave]                  list the placeable tokens and their colors";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Schedule(PathBuf),
    Play { path: PathBuf, repeat: bool },
    Palette { octave: Option<i32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub verbose: bool,
}

pub fn parse_args(args: &[String]) -> Result<Cli, String> {
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let repeat = args.iter().any(|a| a == "--repeat");
    if let Some(flag) = args
        .iter()
        .find(|a| a.starts_with('-') && !matches!(a.as_str(), "-v" | "--verbose" | "--repeat"))
    {
        return Err(format!("unknown option {}", flag));
    }
    let mut positional = args.iter().filter(|a| !a.starts_with('-'));

    let command = match positional.next().map(String::as_str) {
        Some("schedule") => Command::Schedule(project_path(positional.next())?),
        Some("play") => Command::Play {
            path: project_path(positional.next())?,
            repeat,
        },
        Some("palette") => {
            let octave = positional
                .next()
                .map(|o| o.parse::<i32>().map_err(|_| format!("invalid octave {}", o)))
                .transpose()?;
            Command::Palette { octave }
        }
        Some(other) => return Err(format!("unknown command {}", other)),
        None => return Err("missing command".to_string()),
    };

    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument {}", extra));
    }
    Ok(Cli { command, verbose })
}

fn project_path(arg: Option<&String>) -> Result<PathBuf, String> {
    arg.map(PathBuf::from)
        .ok_or_else(|| "missing project file".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_schedule_command() {
        let cli = parse_args(&args(&["schedule", "song.json"])).unwrap();
        assert_eq!(cli.command, Command::Schedule(PathBuf::from("song.json")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags_anywhere() {
        let cli = parse_args(&args(&["-v", "play", "song.json", "--repeat"])).unwrap();
        assert_eq!(
            cli.command,
            Command::Play {
                path: PathBuf::from("song.json"),
                repeat: true
            }
        );
        assert!(cli.verbose);
    }

    #[test]
    fn test_palette_octave() {
        let cli = parse_args(&args(&["palette", "3"])).unwrap();
        assert_eq!(cli.command, Command::Palette { octave: Some(3) });
        assert!(parse_args(&args(&["palette", "high"])).is_err());
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["play"])).is_err());
        assert!(parse_args(&args(&["dance"])).is_err());
        assert!(parse_args(&args(&["schedule", "a.json", "b.json"])).is_err());
        assert!(parse_args(&args(&["schedule", "a.json", "--loud"])).is_err());
    }
}
