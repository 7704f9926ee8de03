//! Line-based navigation scripts.
//!
//! ```text
//! # comments and blank lines are skipped
//! navigate dashboard
//! navigate profile user_id="42" --single-top
//! navigate registered --pop-up-to=home --inclusive --launch=both
//! action show_profile user_id="7"
//! route app://duo/users/9
//! pop
//! pop home inclusive
//! up
//! host-pop
//! layout 2
//! state scroll=120
//! capture
//! restore
//! ```
//!
//! Unquoted argument values are read as bool, int or float when they parse
//! as one; quote them to force a string.

use thiserror::Error;

use crate::core::command::NavTarget;
use crate::graph::action::LaunchScreen;
use crate::graph::args::{ArgValue, Args};
use crate::graph::{DestinationId, NavOptions};
use crate::pane::PaneCount;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Navigate {
        target: NavTarget,
        args: Args,
        options: Option<NavOptions>,
    },
    Pop {
        destination: Option<DestinationId>,
        inclusive: bool,
    },
    Up,
    /// The host removes the top entry by itself.
    HostPop,
    Layout(PaneCount),
    /// Saved-state write on the current entry.
    State(String, ArgValue),
    Capture,
    Restore,
}

#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

fn parse_value(raw: &str) -> ArgValue {
    if let Some(s) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return ArgValue::Str(s.to_string());
    }
    if let Ok(b) = raw.parse::<bool>() {
        return ArgValue::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return ArgValue::Int(i);
    }
    if let Ok(x) = raw.parse::<f64>() {
        return ArgValue::Float(x);
    }
    ArgValue::Str(raw.to_string())
}

fn parse_launch(raw: &str) -> Result<LaunchScreen, String> {
    match raw {
        "default" => Ok(LaunchScreen::Default),
        "start" => Ok(LaunchScreen::Start),
        "end" => Ok(LaunchScreen::End),
        "both" => Ok(LaunchScreen::Both),
        other => Err(format!("unknown launch screen \"{other}\"")),
    }
}

/// Parses `key=value` words and `--flags` after a navigation target.
fn parse_navigation(target: NavTarget, words: &[&str]) -> Result<Step, String> {
    let mut args = Args::new();
    let mut options = NavOptions::new();
    let mut has_options = false;
    let mut pop_up_to: Option<String> = None;
    let mut inclusive = false;

    for word in words {
        if let Some(flag) = word.strip_prefix("--") {
            has_options = true;
            match flag.split_once('=') {
                Some(("pop-up-to", dest)) => pop_up_to = Some(dest.to_string()),
                Some(("launch", screen)) => options = options.launch_screen(parse_launch(screen)?),
                None if flag == "inclusive" => inclusive = true,
                None if flag == "single-top" => options = options.single_top(true),
                _ => return Err(format!("unknown flag --{flag}")),
            }
        } else if let Some((key, value)) = word.split_once('=') {
            args.insert(key, parse_value(value));
        } else {
            return Err(format!("expected key=value, got \"{word}\""));
        }
    }

    if inclusive && pop_up_to.is_none() {
        return Err("--inclusive needs --pop-up-to".to_string());
    }
    if let Some(dest) = pop_up_to {
        options = options.pop_up_to(dest, inclusive);
    }
    Ok(Step::Navigate {
        target,
        args,
        options: has_options.then_some(options),
    })
}

fn parse_line(line: &str) -> Result<Option<Step>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let (command, rest) = words.split_first().ok_or("empty line")?;

    let step = match (*command, rest) {
        ("navigate", [dest, more @ ..]) => parse_navigation(NavTarget::destination(*dest), more)?,
        ("action", [id, more @ ..]) => parse_navigation(NavTarget::action(*id), more)?,
        ("route", [route, more @ ..]) => parse_navigation(NavTarget::route(*route), more)?,
        ("pop", []) => Step::Pop {
            destination: None,
            inclusive: false,
        },
        ("pop", [dest]) => Step::Pop {
            destination: Some((*dest).into()),
            inclusive: false,
        },
        ("pop", [dest, "inclusive"]) => Step::Pop {
            destination: Some((*dest).into()),
            inclusive: true,
        },
        ("up", []) => Step::Up,
        ("host-pop", []) => Step::HostPop,
        ("layout", [count]) => {
            let n: u8 = count.parse().map_err(|_| format!("bad pane count \"{count}\""))?;
            Step::Layout(PaneCount::try_from(n)?)
        }
        ("state", [pair]) => {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got \"{pair}\""))?;
            Step::State(key.to_string(), parse_value(value))
        }
        ("capture", []) => Step::Capture,
        ("restore", []) => Step::Restore,
        (other, _) => return Err(format!("cannot parse \"{other}\" command: {line}")),
    };
    Ok(Some(step))
}

/// Parses a whole script. Errors carry 1-based line numbers.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (i, line) in source.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => {}
            Err(message) => return Err(ScriptError { line: i + 1, message }),
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_script() {
        let steps = parse_script(
            "# warm up\n\nnavigate dashboard\npop\npop home inclusive\nup\nlayout 2\n",
        )
        .unwrap();
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0],
            Step::Navigate {
                target: NavTarget::destination("dashboard"),
                args: Args::new(),
                options: None,
            }
        );
        assert_eq!(
            steps[2],
            Step::Pop {
                destination: Some("home".into()),
                inclusive: true
            }
        );
        assert_eq!(steps[4], Step::Layout(PaneCount::Dual));
    }

    #[test]
    fn test_parse_navigation_flags_and_args() {
        let steps =
            parse_script(r#"navigate profile user_id="42" score=7 --pop-up-to=home --inclusive --single-top"#)
                .unwrap();
        let Step::Navigate { args, options, .. } = &steps[0] else {
            panic!("expected navigate, got {:?}", steps[0]);
        };
        assert_eq!(args.get("user_id"), Some(&ArgValue::from("42")));
        assert_eq!(args.get("score"), Some(&ArgValue::Int(7)));
        let options = options.as_ref().unwrap();
        assert!(options.single_top);
        let pop = options.pop_up_to.as_ref().unwrap();
        assert_eq!(pop.destination.as_str(), "home");
        assert!(pop.inclusive);
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), ArgValue::Bool(true));
        assert_eq!(parse_value("-3"), ArgValue::Int(-3));
        assert_eq!(parse_value("2.5"), ArgValue::Float(2.5));
        assert_eq!(parse_value("ada"), ArgValue::from("ada"));
        assert_eq!(parse_value("\"12\""), ArgValue::from("12"));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_script("navigate home\nfly away\n").unwrap_err();
        assert_eq!(err.line, 2);
        let err = parse_script("layout 3").unwrap_err();
        assert!(err.message.contains("pane count"));
        let err = parse_script("navigate home --inclusive").unwrap_err();
        assert!(err.message.contains("--pop-up-to"));
        let err = parse_script("navigate home --launch=sideways").unwrap_err();
        assert!(err.message.contains("sideways"));
    }
}
